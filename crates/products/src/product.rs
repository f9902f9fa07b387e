use serde::{Deserialize, Serialize};

use catalog_core::{Entity, ProductId};

/// A catalog product record.
///
/// Every field defaults when absent from the wire, which is what lets the
/// same shape carry full records, create requests (id ignored) and patches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub quantity: i64,
    pub code_value: String,
    pub is_published: bool,
    /// Date representation, opaque to the catalog.
    pub expiration: String,
    pub price: f64,
}

impl Product {
    /// Merge the "explicitly set" fields of `patch` into `self`.
    ///
    /// A field counts as set when it is a non-empty string, `true`, or a
    /// strictly positive number. There is no way to clear a flag back to
    /// `false` or zero a quantity through a patch. `patch.id` is ignored.
    pub fn merge_patch(&mut self, patch: &Product) {
        if !patch.name.is_empty() {
            self.name = patch.name.clone();
        }
        if patch.quantity > 0 {
            self.quantity = patch.quantity;
        }
        if !patch.code_value.is_empty() {
            self.code_value = patch.code_value.clone();
        }
        if patch.is_published {
            self.is_published = true;
        }
        if !patch.expiration.is_empty() {
            self.expiration = patch.expiration.clone();
        }
        if patch.price > 0.0 {
            self.price = patch.price;
        }
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn assign_id(&mut self, id: Self::Id) {
        self.id = id;
    }
}
