//! Catalog service: the interface shape the transport layer expects.
//!
//! Mostly 1:1 forwarding to a [`ProductStore`]. The one exception is
//! [`CatalogService::search_products`], which filters over the full listing
//! itself with a strict `price > threshold` test.

use catalog_core::{CatalogResult, ProductId};

use crate::product::Product;
use crate::store::ProductStore;

#[derive(Debug, Clone)]
pub struct CatalogService<S> {
    store: S,
}

impl<S> CatalogService<S>
where
    S: ProductStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list_products(&self) -> CatalogResult<Vec<Product>> {
        self.store.list_all()
    }

    pub fn get_product(&self, id: ProductId) -> CatalogResult<Product> {
        self.store.get_by_id(id)
    }

    /// Products priced strictly above `price_gt`.
    ///
    /// Unlike [`ProductStore::filter_by_price_above`] this excludes records
    /// priced exactly at the threshold, and fails with `EmptyCollection` when
    /// there is nothing to search.
    pub fn search_products(&self, price_gt: f64) -> CatalogResult<Vec<Product>> {
        let products = self.store.list_all()?;
        Ok(products.into_iter().filter(|p| p.price > price_gt).collect())
    }

    /// Inclusive (`>=`) price filter, delegated to the store.
    pub fn products_priced_from(&self, threshold: f64) -> Vec<Product> {
        self.store.filter_by_price_above(threshold)
    }

    pub fn create_product(&self, product: Product) -> CatalogResult<Product> {
        self.store.create(product)
    }

    pub fn update_product(&self, id: ProductId, product: Product) -> CatalogResult<Product> {
        self.store.update(id, product)
    }

    pub fn patch_product(&self, id: ProductId, patch: Product) -> CatalogResult<Product> {
        self.store.patch(id, patch)
    }

    pub fn delete_product(&self, id: ProductId) -> CatalogResult<()> {
        self.store.delete(id)
    }
}
