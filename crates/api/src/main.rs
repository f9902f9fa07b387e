use std::sync::Arc;

use anyhow::Context;

use catalog_api::{app, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    catalog_observability::init(config.log_format);

    let services = app::services::build_services(&config).with_context(|| {
        format!("failed to load products from {}", config.products_path.display())
    })?;

    let app = app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
