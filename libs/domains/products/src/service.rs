//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::capitalize::capitalize_words;
use crate::completeness::retain_complete_variants;
use crate::error::{ProductError, ProductResult};
use crate::models::{
    BrandFacet, CategoryFacet, CreateProduct, NamedCount, PageQuery, Product, ProductDetails,
    ProductFacets, ProductFilter, ProductWithVariants, UpdateProduct,
};
use crate::pagination::PaginationParams;
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// The service layer validates ids and references, applies the in-memory
/// price-table consistency filter and shapes facet labels. Persistence
/// errors are passed through untouched.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List active products whose variants are fully priced
    ///
    /// The database narrows to products with at least one variant whose SKUs
    /// all have a price table. Variants whose SKUs disagree on the set of
    /// price tables are then removed, and products left without variants are
    /// dropped, so a page may hold fewer than `limit` products.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<ProductDetails>> {
        let pagination = PaginationParams::new(filter.page, filter.limit);
        let products = self
            .repository
            .find_active(pagination, filter.search_term())
            .await?;

        let fetched = products.len();
        let products = retain_complete_variants(products);
        tracing::debug!(fetched, returned = products.len(), "Listed products");

        Ok(products)
    }

    /// Get an active product by ID
    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> ProductResult<ProductDetails> {
        ensure_valid_id(id)?;

        self.repository
            .find_active_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Create a product with its variants and SKUs
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create(&self, input: CreateProduct) -> ProductResult<ProductWithVariants> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        match input.company_id {
            Some(company_id) if company_id > 0 => self.ensure_company_exists(company_id).await?,
            _ => {
                return Err(ProductError::InvalidArgument(
                    "company_id must be a positive integer".to_string(),
                ));
            }
        }

        self.repository.create(input).await
    }

    /// Update an active product
    ///
    /// Returns the scalar product row; when `variants` is given, the prior
    /// variants and their SKUs are replaced wholesale.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: UpdateProduct) -> ProductResult<Product> {
        ensure_valid_id(id)?;
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        if let Some(company_id) = input.company_id {
            if company_id <= 0 {
                return Err(ProductError::InvalidArgument(
                    "company_id must be a positive integer".to_string(),
                ));
            }
            self.ensure_company_exists(company_id).await?;
        }

        self.repository
            .update(id, input)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Soft delete an active product
    ///
    /// A second delete of the same product reports `NotFound`.
    #[instrument(skip(self))]
    pub async fn soft_delete(&self, id: i32) -> ProductResult<()> {
        ensure_valid_id(id)?;

        if !self.repository.soft_delete(id).await? {
            return Err(ProductError::NotFound(id));
        }
        Ok(())
    }

    /// List soft-deleted products
    #[instrument(skip(self))]
    pub async fn list_deleted(&self, query: PageQuery) -> ProductResult<Vec<ProductDetails>> {
        let pagination = PaginationParams::new(query.page, query.limit);
        self.repository.find_deleted(pagination).await
    }

    /// Get a soft-deleted product by ID
    #[instrument(skip(self))]
    pub async fn get_deleted(&self, id: i32) -> ProductResult<ProductDetails> {
        ensure_valid_id(id)?;

        self.repository
            .find_deleted_by_id(id)
            .await?
            .ok_or(ProductError::DeletedNotFound(id))
    }

    /// Count active products matching the search
    ///
    /// Uses the same database predicate as [`Self::list`] but not the
    /// in-memory consistency filter, so it can be larger than the number of
    /// products `list` would return across all pages.
    #[instrument(skip(self))]
    pub async fn count(&self, filter: ProductFilter) -> ProductResult<u64> {
        self.repository.count_active(filter.search_term()).await
    }

    /// Facet counts for the catalog filters, with display-cased labels
    #[instrument(skip(self))]
    pub async fn filters(&self) -> ProductResult<ProductFacets> {
        let facets = self.repository.facet_counts().await?;
        Ok(display_labels(facets))
    }

    async fn ensure_company_exists(&self, company_id: i32) -> ProductResult<()> {
        if !self.repository.company_exists(company_id).await? {
            return Err(ProductError::InvalidArgument(format!(
                "company {} does not exist",
                company_id
            )));
        }
        Ok(())
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

fn ensure_valid_id(id: i32) -> ProductResult<()> {
    if id <= 0 {
        return Err(ProductError::InvalidArgument("invalid id".to_string()));
    }
    Ok(())
}

fn display_labels(facets: ProductFacets) -> ProductFacets {
    let named = |count: NamedCount| NamedCount {
        name: capitalize_words(&count.name),
        quantity: count.quantity,
    };

    ProductFacets {
        brands: facets
            .brands
            .into_iter()
            .map(|brand| BrandFacet {
                name: capitalize_words(&brand.name),
                ..brand
            })
            .collect(),
        categories: facets
            .categories
            .into_iter()
            .map(|category| CategoryFacet {
                name: capitalize_words(&category.name),
                quantity: category.quantity,
                subcategories: category.subcategories.into_iter().map(named).collect(),
            })
            .collect(),
        types: facets.types.into_iter().map(named).collect(),
        genders: facets.genders.into_iter().map(named).collect(),
        prompt_delivery: facets.prompt_delivery,
    }
}
