//! Products API routes

use axum::Router;
use domain_products::{PgProductRepository, ProductService, handlers};

use crate::state::AppState;

/// Create products router
pub fn router(state: &AppState) -> Router {
    let repository = PgProductRepository::new(state.db.clone())
        .with_atomic_updates(state.config.atomic_variant_replacement);
    let service = ProductService::new(repository);
    handlers::router(service)
}
