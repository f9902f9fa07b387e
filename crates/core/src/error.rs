//! Catalog error model.

use thiserror::Error;

use crate::id::ProductId;

/// Result type used across the catalog layers.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog-level error.
///
/// Every variant is a deterministic function of current state and input;
/// nothing here is transient, so callers never retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The seed source was unreadable or did not decode into product records.
    #[error("failed to load products: {0}")]
    Load(String),

    /// `load` was called on a store that already holds a collection.
    #[error("product catalog already loaded")]
    AlreadyLoaded,

    /// A listing was requested while the collection is empty or unloaded.
    #[error("no products found")]
    EmptyCollection,

    /// An id-keyed operation found no matching record.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// No id above the current maximum is representable.
    #[error("product id space exhausted")]
    IdsExhausted,

    /// An identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl CatalogError {
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(id: ProductId) -> Self {
        Self::NotFound(id)
    }

    /// Stable machine-readable code, used by the transport layer.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Load(_) => "load_failed",
            Self::AlreadyLoaded => "already_loaded",
            Self::EmptyCollection => "empty_collection",
            Self::NotFound(_) => "not_found",
            Self::IdsExhausted => "ids_exhausted",
            Self::InvalidId(_) => "invalid_id",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_id() {
        let err = CatalogError::not_found(ProductId::new(42));
        assert_eq!(err.to_string(), "product 42 not found");
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn error_kinds_are_distinguishable() {
        assert_ne!(CatalogError::EmptyCollection.code(), CatalogError::load("x").code());
        assert_ne!(
            CatalogError::EmptyCollection,
            CatalogError::not_found(ProductId::new(1))
        );
    }
}
