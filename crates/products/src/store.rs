//! Catalog store: the exclusive owner of the product collection.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use catalog_core::{CatalogError, CatalogResult, Entity, ProductId};

use crate::product::Product;

/// Storage abstraction over the product collection.
///
/// Every operation completes before returning and is either fully applied or
/// not applied at all.
pub trait ProductStore: Send + Sync {
    /// Full collection in storage (append) order.
    fn list_all(&self) -> CatalogResult<Vec<Product>>;
    fn get_by_id(&self, id: ProductId) -> CatalogResult<Product>;
    /// Records with `price >= threshold`, in storage order.
    fn filter_by_price_above(&self, threshold: f64) -> Vec<Product>;
    /// Appends `product` under a freshly assigned id, ignoring any id it carries.
    fn create(&self, product: Product) -> CatalogResult<Product>;
    /// Replaces the record at `id`; the stored record keeps `id`.
    fn update(&self, id: ProductId, product: Product) -> CatalogResult<Product>;
    /// Merges the set fields of `patch` into the record at `id`.
    fn patch(&self, id: ProductId, patch: Product) -> CatalogResult<Product>;
    fn delete(&self, id: ProductId) -> CatalogResult<()>;
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn list_all(&self) -> CatalogResult<Vec<Product>> {
        (**self).list_all()
    }

    fn get_by_id(&self, id: ProductId) -> CatalogResult<Product> {
        (**self).get_by_id(id)
    }

    fn filter_by_price_above(&self, threshold: f64) -> Vec<Product> {
        (**self).filter_by_price_above(threshold)
    }

    fn create(&self, product: Product) -> CatalogResult<Product> {
        (**self).create(product)
    }

    fn update(&self, id: ProductId, product: Product) -> CatalogResult<Product> {
        (**self).update(id, product)
    }

    fn patch(&self, id: ProductId, patch: Product) -> CatalogResult<Product> {
        (**self).patch(id, patch)
    }

    fn delete(&self, id: ProductId) -> CatalogResult<()> {
        (**self).delete(id)
    }
}

/// In-memory product store.
///
/// `None` means nothing has been loaded yet; `Some(vec![])` is a loaded but
/// empty catalog. The whole collection sits behind one lock, held for the
/// full duration of each operation.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    inner: RwLock<Option<Vec<Product>>>,
}

impl InMemoryProductStore {
    /// An unloaded store. Call [`load`](Self::load) before serving requests.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `products`, as if loaded.
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            inner: RwLock::new(Some(products)),
        }
    }

    /// Open `path` and load the JSON array it contains.
    pub fn from_path(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let store = Self::new();
        store.load_path(path)?;
        Ok(store)
    }

    pub fn load_path(&self, path: impl AsRef<Path>) -> CatalogResult<usize> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| CatalogError::load(format!("{}: {e}", path.display())))?;
        self.load(BufReader::new(file))
    }

    /// Decode a JSON array of products from `source` into the store.
    ///
    /// Records sharing an id are rejected as a load failure.
    ///
    /// Meant to be called exactly once at startup; a second call fails with
    /// [`CatalogError::AlreadyLoaded`] and leaves the collection untouched.
    /// Returns the number of records loaded.
    pub fn load<R: Read>(&self, source: R) -> CatalogResult<usize> {
        let mut guard = self.write();
        if guard.is_some() {
            return Err(CatalogError::AlreadyLoaded);
        }

        let products: Vec<Product> =
            serde_json::from_reader(source).map_err(|e| CatalogError::load(e.to_string()))?;

        let mut seen = HashSet::with_capacity(products.len());
        if let Some(dup) = products.iter().map(|p| p.id).find(|id| !seen.insert(*id)) {
            return Err(CatalogError::load(format!("duplicate product id {dup}")));
        }

        let count = products.len();
        *guard = Some(products);

        tracing::info!(count, "product catalog loaded");
        Ok(count)
    }

    /// Whether a collection has been loaded (possibly empty).
    pub fn is_loaded(&self) -> bool {
        self.read().is_some()
    }

    pub fn len(&self) -> usize {
        self.read().as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Vec<Product>>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Vec<Product>>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// `1 + max(existing ids)`, with the max floored at `0` so an empty or
/// all-negative collection starts at `1`.
fn next_id(products: &[Product]) -> CatalogResult<ProductId> {
    let max = products
        .iter()
        .map(|p| p.id)
        .fold(ProductId::default(), Ord::max);
    max.checked_next().ok_or(CatalogError::IdsExhausted)
}

fn position(products: &[Product], id: ProductId) -> Option<usize> {
    products.iter().position(|p| p.id() == id)
}

impl ProductStore for InMemoryProductStore {
    fn list_all(&self) -> CatalogResult<Vec<Product>> {
        match self.read().as_ref() {
            Some(products) if !products.is_empty() => Ok(products.clone()),
            _ => Err(CatalogError::EmptyCollection),
        }
    }

    fn get_by_id(&self, id: ProductId) -> CatalogResult<Product> {
        let guard = self.read();
        let found = guard
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|p| p.id() == id)
            .cloned();

        found.ok_or_else(|| {
            tracing::debug!(%id, "product lookup missed");
            CatalogError::not_found(id)
        })
    }

    fn filter_by_price_above(&self, threshold: f64) -> Vec<Product> {
        self.read()
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter(|p| p.price >= threshold)
            .cloned()
            .collect()
    }

    fn create(&self, mut product: Product) -> CatalogResult<Product> {
        let mut guard = self.write();
        let products = guard.get_or_insert_with(Vec::new);

        let id = next_id(products)?;
        product.assign_id(id);
        products.push(product.clone());

        tracing::debug!(%id, "product created");
        Ok(product)
    }

    fn update(&self, id: ProductId, mut product: Product) -> CatalogResult<Product> {
        let mut guard = self.write();
        let products = guard.as_mut().ok_or(CatalogError::not_found(id))?;
        let idx = position(products, id).ok_or(CatalogError::not_found(id))?;

        product.assign_id(id);
        products[idx] = product.clone();

        tracing::debug!(%id, "product updated");
        Ok(product)
    }

    fn patch(&self, id: ProductId, patch: Product) -> CatalogResult<Product> {
        let mut guard = self.write();
        let products = guard.as_mut().ok_or(CatalogError::not_found(id))?;
        let target = products
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(CatalogError::not_found(id))?;

        target.merge_patch(&patch);

        tracing::debug!(%id, "product patched");
        Ok(target.clone())
    }

    fn delete(&self, id: ProductId) -> CatalogResult<()> {
        let mut guard = self.write();
        let products = guard.as_mut().ok_or(CatalogError::not_found(id))?;
        let idx = position(products, id).ok_or(CatalogError::not_found(id))?;

        // `Vec::remove` shifts the tail, keeping the remaining order.
        products.remove(idx);

        tracing::debug!(%id, "product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, price: f64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("product-{id}"),
            quantity: 10,
            code_value: format!("CODE{id}"),
            is_published: true,
            expiration: "01/01/2030".to_string(),
            price,
        }
    }

    fn seeded() -> InMemoryProductStore {
        InMemoryProductStore::with_products(vec![product(1, 10.0), product(2, 20.0)])
    }

    fn ids(products: &[Product]) -> Vec<i64> {
        products.iter().map(|p| p.id.get()).collect()
    }

    #[test]
    fn load_decodes_json_array() {
        let store = InMemoryProductStore::new();
        let json = r#"[
            {"id":1,"name":"Oil","quantity":439,"code_value":"S82254D","is_published":true,"expiration":"15/12/2021","price":71.42},
            {"id":2,"name":"Pineapple","quantity":345,"code_value":"M4637HX","is_published":false,"expiration":"09/08/2021","price":352.79}
        ]"#;

        let count = store.load(json.as_bytes()).unwrap();
        assert_eq!(count, 2);
        assert!(store.is_loaded());

        let p = store.get_by_id(ProductId::new(2)).unwrap();
        assert_eq!(p.name, "Pineapple");
        assert_eq!(p.code_value, "M4637HX");
        assert!(!p.is_published);
    }

    #[test]
    fn load_rejects_malformed_content() {
        let store = InMemoryProductStore::new();
        let err = store.load(r#"{"not":"an array"}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::Load(_)));
        assert!(!store.is_loaded());
    }

    #[test]
    fn load_rejects_missing_file() {
        let err = InMemoryProductStore::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, CatalogError::Load(_)));
    }

    #[test]
    fn load_twice_is_rejected() {
        let store = InMemoryProductStore::new();
        store.load("[]".as_bytes()).unwrap();
        let err = store.load(r#"[{"id":1}]"#.as_bytes()).unwrap_err();
        assert_eq!(err, CatalogError::AlreadyLoaded);
        assert!(store.is_empty());
    }

    #[test]
    fn list_all_fails_when_unloaded_or_empty() {
        let unloaded = InMemoryProductStore::new();
        assert_eq!(unloaded.list_all().unwrap_err(), CatalogError::EmptyCollection);
        assert!(!unloaded.is_loaded());

        let empty = InMemoryProductStore::with_products(vec![]);
        assert_eq!(empty.list_all().unwrap_err(), CatalogError::EmptyCollection);
        assert!(empty.is_loaded());
    }

    #[test]
    fn list_all_follows_storage_order() {
        let store = seeded();
        store.create(product(0, 1.0)).unwrap();
        assert_eq!(ids(&store.list_all().unwrap()), vec![1, 2, 3]);
    }

    #[test]
    fn get_by_id_misses_with_not_found() {
        let store = seeded();
        assert_eq!(
            store.get_by_id(ProductId::new(7)).unwrap_err(),
            CatalogError::NotFound(ProductId::new(7))
        );
    }

    #[test]
    fn create_assigns_max_plus_one_and_ignores_supplied_id() {
        let store = seeded();
        let created = store
            .create(Product {
                id: ProductId::new(1),
                name: "x".to_string(),
                price: 5.0,
                ..Product::default()
            })
            .unwrap();

        assert_eq!(created.id, ProductId::new(3));
        assert_eq!(store.get_by_id(ProductId::new(3)).unwrap().name, "x");
        assert_eq!(store.get_by_id(ProductId::new(1)).unwrap().name, "product-1");
    }

    #[test]
    fn create_on_unloaded_store_starts_at_one() {
        let store = InMemoryProductStore::new();
        let created = store.create(product(42, 1.0)).unwrap();
        assert_eq!(created.id, ProductId::new(1));
    }

    #[test]
    fn create_at_max_id_fails_without_mutating() {
        let store = InMemoryProductStore::new();
        store.load(r#"[{"id":9223372036854775807}]"#.as_bytes()).unwrap();

        let err = store.create(Product::default()).unwrap_err();

        assert_eq!(err, CatalogError::IdsExhausted);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn create_over_negative_ids_starts_at_one() {
        let store = InMemoryProductStore::with_products(vec![product(-5, 1.0)]);
        let created = store.create(Product::default()).unwrap();
        assert_eq!(created.id, ProductId::new(1));
    }

    #[test]
    fn load_rejects_duplicate_ids() {
        let store = InMemoryProductStore::new();
        let err = store
            .load(r#"[{"id":1,"name":"a"},{"id":1,"name":"b"}]"#.as_bytes())
            .unwrap_err();

        assert_eq!(err, CatalogError::load("duplicate product id 1"));
        assert!(!store.is_loaded());
    }

    #[test]
    fn create_after_delete_does_not_reuse_lower_ids() {
        let store = seeded();
        store.delete(ProductId::new(1)).unwrap();
        let created = store.create(product(0, 1.0)).unwrap();
        assert_eq!(created.id, ProductId::new(3));
    }

    #[test]
    fn create_after_deleting_max_reuses_it() {
        let store = seeded();
        store.delete(ProductId::new(2)).unwrap();
        let created = store.create(product(0, 1.0)).unwrap();
        assert_eq!(created.id, ProductId::new(2));
    }

    #[test]
    fn filter_is_inclusive_of_threshold() {
        let store = seeded();
        store
            .create(Product {
                name: "x".to_string(),
                price: 5.0,
                ..Product::default()
            })
            .unwrap();

        assert_eq!(ids(&store.filter_by_price_above(10.0)), vec![1, 2]);
        assert_eq!(ids(&store.filter_by_price_above(10.01)), vec![2]);
        assert_eq!(ids(&store.filter_by_price_above(0.0)), vec![1, 2, 3]);
        assert!(store.filter_by_price_above(20.5).is_empty());
    }

    #[test]
    fn filter_on_unloaded_store_is_empty() {
        assert!(InMemoryProductStore::new().filter_by_price_above(0.0).is_empty());
    }

    #[test]
    fn update_replaces_record_and_keeps_id() {
        let store = seeded();
        let updated = store.update(ProductId::new(2), product(99, 3.5)).unwrap();

        assert_eq!(updated.id, ProductId::new(2));
        let stored = store.get_by_id(ProductId::new(2)).unwrap();
        assert_eq!(stored.price, 3.5);
        assert_eq!(stored.name, "product-99");
        assert!(store.get_by_id(ProductId::new(99)).is_err());
    }

    #[test]
    fn update_missing_id_leaves_store_untouched() {
        let store = seeded();
        let err = store.update(ProductId::new(5), product(5, 1.0)).unwrap_err();
        assert_eq!(err, CatalogError::NotFound(ProductId::new(5)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn patch_merges_set_fields_only() {
        let store = seeded();
        let patched = store
            .patch(
                ProductId::new(1),
                Product {
                    name: "renamed".to_string(),
                    price: 12.5,
                    ..Product::default()
                },
            )
            .unwrap();

        assert_eq!(patched.name, "renamed");
        assert_eq!(patched.price, 12.5);
        assert_eq!(patched.quantity, 10);
        assert_eq!(patched.code_value, "CODE1");
        assert_eq!(store.get_by_id(ProductId::new(1)).unwrap(), patched);
    }

    #[test]
    fn patch_missing_id_is_not_found() {
        let store = seeded();
        let err = store.patch(ProductId::new(9), Product::default()).unwrap_err();
        assert_eq!(err, CatalogError::NotFound(ProductId::new(9)));
    }

    #[test]
    fn delete_preserves_order_of_remaining() {
        let store = InMemoryProductStore::with_products(vec![
            product(1, 1.0),
            product(2, 2.0),
            product(3, 3.0),
        ]);
        store.delete(ProductId::new(2)).unwrap();
        assert_eq!(ids(&store.list_all().unwrap()), vec![1, 3]);

        assert_eq!(
            store.delete(ProductId::new(2)).unwrap_err(),
            CatalogError::NotFound(ProductId::new(2))
        );
    }

    #[test]
    fn mutations_on_unloaded_store_are_not_found() {
        let store = InMemoryProductStore::new();
        let id = ProductId::new(1);
        assert_eq!(store.update(id, Product::default()).unwrap_err(), CatalogError::NotFound(id));
        assert_eq!(store.patch(id, Product::default()).unwrap_err(), CatalogError::NotFound(id));
        assert_eq!(store.delete(id).unwrap_err(), CatalogError::NotFound(id));
        assert!(!store.is_loaded());
    }

    #[test]
    fn concurrent_creates_assign_distinct_ids() {
        let store = Arc::new(seeded());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    (0..25)
                        .map(|_| store.create(Product::default()).unwrap().id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all: Vec<ProductId> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 200);
        assert_eq!(store.len(), 202);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_patch() -> impl Strategy<Value = Product> {
            (
                prop_oneof![Just(String::new()), "[a-z]{1,12}"],
                -5i64..50,
                prop_oneof![Just(String::new()), "[A-Z0-9]{1,8}"],
                any::<bool>(),
                -5.0f64..100.0,
            )
                .prop_map(|(name, quantity, code_value, is_published, price)| Product {
                    id: ProductId::new(999),
                    name,
                    quantity,
                    code_value,
                    is_published,
                    expiration: String::new(),
                    price,
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: every created record gets a distinct id.
            #[test]
            fn created_ids_are_unique(creates in 1usize..40, seed_ids in proptest::collection::btree_set(1i64..100, 0..10)) {
                let seed = seed_ids.iter().map(|id| product(*id, 1.0)).collect();
                let store = InMemoryProductStore::with_products(seed);

                for _ in 0..creates {
                    store.create(Product::default()).unwrap();
                }

                let mut all = ids(&store.list_all().unwrap());
                let total = all.len();
                all.sort_unstable();
                all.dedup();
                prop_assert_eq!(all.len(), total);
            }

            /// Property: update never changes the targeted id.
            #[test]
            fn update_keeps_target_id(supplied in any::<i64>(), price in 0.0f64..1000.0) {
                let store = seeded();
                store.update(ProductId::new(1), product(supplied, price)).unwrap();
                let stored = store.get_by_id(ProductId::new(1)).unwrap();
                prop_assert_eq!(stored.id, ProductId::new(1));
                prop_assert_eq!(stored.price, price);
            }

            /// Property: patch only moves fields it considers set.
            #[test]
            fn patch_applies_set_fields_only(patch in arb_patch()) {
                let store = seeded();
                let before = store.get_by_id(ProductId::new(2)).unwrap();
                let after = store.patch(ProductId::new(2), patch.clone()).unwrap();

                prop_assert_eq!(after.id, before.id);
                if patch.name.is_empty() {
                    prop_assert_eq!(&after.name, &before.name);
                } else {
                    prop_assert_eq!(&after.name, &patch.name);
                }
                if patch.quantity > 0 {
                    prop_assert_eq!(after.quantity, patch.quantity);
                } else {
                    prop_assert_eq!(after.quantity, before.quantity);
                }
                if patch.price > 0.0 {
                    prop_assert_eq!(after.price, patch.price);
                } else {
                    prop_assert_eq!(after.price, before.price);
                }
                prop_assert_eq!(after.is_published, before.is_published || patch.is_published);
                prop_assert_eq!(&after.expiration, &before.expiration);
            }

            /// Property: delete removes exactly one record.
            #[test]
            fn delete_shrinks_by_one(n in 1i64..30, pick in 0i64..30) {
                let target = (pick % n) + 1;
                let store = InMemoryProductStore::with_products(
                    (1..=n).map(|id| product(id, id as f64)).collect(),
                );

                store.delete(ProductId::new(target)).unwrap();

                prop_assert_eq!(store.len() as i64, n - 1);
                prop_assert_eq!(
                    store.get_by_id(ProductId::new(target)).unwrap_err(),
                    CatalogError::NotFound(ProductId::new(target))
                );
            }
        }
    }
}
