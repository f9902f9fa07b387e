use axum::{routing::get, Router};

pub mod products;
pub mod system;

pub fn router() -> Router {
    Router::new()
        .route("/ping", get(system::ping))
        .nest("/products", products::router())
}
