use async_trait::async_trait;

use crate::error::ProductResult;
use crate::models::{
    CreateProduct, Product, ProductDetails, ProductFacets, ProductWithVariants, UpdateProduct,
};
use crate::pagination::PaginationParams;

/// Repository trait for Product persistence
///
/// "Active" products are the ones with no `deleted_at`. Absence is reported
/// as `None`/`false`, never as an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// One page of active products that have at least one variant whose SKUs
    /// all carry a price table, optionally narrowed by a search term, with
    /// the full include graph. Ordered by id.
    async fn find_active(
        &self,
        pagination: PaginationParams,
        search: Option<String>,
    ) -> ProductResult<Vec<ProductDetails>>;

    /// Active product by id with the full include graph
    async fn find_active_by_id(&self, id: i32) -> ProductResult<Option<ProductDetails>>;

    /// Count of the rows `find_active` pages over
    async fn count_active(&self, search: Option<String>) -> ProductResult<u64>;

    /// One page of soft-deleted products with the full include graph
    async fn find_deleted(&self, pagination: PaginationParams)
    -> ProductResult<Vec<ProductDetails>>;

    /// Soft-deleted product by id with the full include graph
    async fn find_deleted_by_id(&self, id: i32) -> ProductResult<Option<ProductDetails>>;

    /// Check if a company exists
    async fn company_exists(&self, id: i32) -> ProductResult<bool>;

    /// Insert a product with its variants and SKUs in one transaction
    async fn create(&self, input: CreateProduct) -> ProductResult<ProductWithVariants>;

    /// Update an active product; replaces all variants when `input.variants` is set
    async fn update(&self, id: i32, input: UpdateProduct) -> ProductResult<Option<Product>>;

    /// Mark an active product as deleted. `false` when no active product matched.
    async fn soft_delete(&self, id: i32) -> ProductResult<bool>;

    /// Raw facet counts over active products (names as stored)
    async fn facet_counts(&self) -> ProductResult<ProductFacets>;
}
