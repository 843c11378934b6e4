//! Products Domain
//!
//! Product catalog backed by PostgreSQL through SeaORM: products with their
//! variants, SKUs and price tables, soft deletion and facet counts.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Id checks, company checks, completeness filter
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + PostgreSQL implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Entity    │  ← SeaORM entities mapped onto the domain models
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{handlers, PgProductRepository, ProductService};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://localhost/catalog").await?;
//!
//! let repository = PgProductRepository::new(db).with_atomic_updates(true);
//! let service = ProductService::new(repository);
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod capitalize;
pub mod completeness;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod postgres;
pub mod repository;
pub mod service;

#[cfg(test)]
mod fixtures;

// Re-export commonly used types
pub use capitalize::capitalize_words;
pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{
    CountResponse, CreateProduct, CreateSku, CreateVariant, Gender, MessageResponse, PageQuery,
    Product, ProductDetails, ProductFacets, ProductFilter, ProductType, ProductWithVariants,
    UpdateProduct,
};
pub use pagination::PaginationParams;
pub use postgres::PgProductRepository;
pub use repository::ProductRepository;
pub use service::ProductService;
