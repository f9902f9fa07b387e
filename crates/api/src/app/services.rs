use std::sync::Arc;

use catalog_core::CatalogResult;
use catalog_products::{CatalogService, InMemoryProductStore};

use crate::config::Config;

/// The catalog service handle shared by all handlers.
pub type AppServices = CatalogService<Arc<InMemoryProductStore>>;

/// Load the product seed file named by `config` and wrap it in a service.
///
/// A load failure is fatal to startup.
pub fn build_services(config: &Config) -> CatalogResult<AppServices> {
    let store = InMemoryProductStore::from_path(&config.products_path)?;
    tracing::info!(
        path = %config.products_path.display(),
        products = store.len(),
        "catalog store ready"
    );
    Ok(services_from_store(store))
}

pub fn services_from_store(store: InMemoryProductStore) -> AppServices {
    CatalogService::new(Arc::new(store))
}
