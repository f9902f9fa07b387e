use serde::Deserialize;

use catalog_products::Product;

// -------------------------
// Request DTOs
// -------------------------

/// Body of create, update and patch requests.
///
/// Absent fields decode to their zero value; that is what patch merging
/// treats as "not supplied". There is no `id` field: ids are assigned by the
/// store, so a client-sent `id` is ignored like any other unknown key.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductRequest {
    pub name: String,
    pub quantity: i64,
    pub code_value: String,
    pub is_published: bool,
    pub expiration: String,
    pub price: f64,
}

impl From<ProductRequest> for Product {
    fn from(req: ProductRequest) -> Self {
        Product {
            name: req.name,
            quantity: req.quantity,
            code_value: req.code_value,
            is_published: req.is_published,
            expiration: req.expiration,
            price: req.price,
            ..Product::default()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub price: f64,
}
