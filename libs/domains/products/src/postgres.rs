use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::{Expr, ExprTrait, Func, LikeExpr, Query, SelectStatement, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbBackend,
    EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Statement,
    TransactionTrait,
};
use serde::Deserialize;

use crate::entity::{
    BrandsEntity, CategoriesEntity, CompaniesEntity, PriceTablesEntity, PriceTablesSkusEntity,
    ProductsEntity, SkusEntity, SubcategoriesEntity, VariantsEntity, brands, categories,
    price_tables, price_tables_skus, products, skus, subcategories, variants,
};
use crate::error::{ProductError, ProductResult};
use crate::models::{
    Brand, BrandFacet, Category, CategoryFacet, CreateProduct, CreateVariant, NamedCount,
    PriceTable, PriceTableLink, Product, ProductDetails, ProductFacets, ProductWithVariants,
    PromptDeliveryCounts, SkuDetails, Subcategory, UpdateProduct, VariantDetails, VariantWithSkus,
};
use crate::pagination::PaginationParams;
use crate::repository::ProductRepository;

/// PostgreSQL implementation of ProductRepository
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
    atomic_updates: bool,
}

impl PgProductRepository {
    /// Create a new PostgreSQL product repository
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            atomic_updates: false,
        }
    }

    /// Run each update, including variant replacement, in one transaction.
    ///
    /// Off by default: the scalar update, the variant delete and every
    /// variant insert are then separate statements, and a failure part way
    /// leaves the product with a partial variant set.
    pub fn with_atomic_updates(mut self, enabled: bool) -> Self {
        self.atomic_updates = enabled;
        self
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_active(
        &self,
        pagination: PaginationParams,
        search: Option<String>,
    ) -> ProductResult<Vec<ProductDetails>> {
        let models = ProductsEntity::find()
            .filter(active_condition(search.as_deref()))
            .order_by_asc(products::Column::Id)
            .offset(pagination.skip)
            .limit(pagination.take)
            .all(&self.db)
            .await?;

        tracing::debug!(
            rows = models.len(),
            skip = pagination.skip,
            take = pagination.take,
            "Fetched active products"
        );
        load_details(&self.db, models).await
    }

    async fn find_active_by_id(&self, id: i32) -> ProductResult<Option<ProductDetails>> {
        let model = ProductsEntity::find_by_id(id)
            .filter(products::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;

        load_one(&self.db, model).await
    }

    async fn count_active(&self, search: Option<String>) -> ProductResult<u64> {
        let count = ProductsEntity::find()
            .filter(active_condition(search.as_deref()))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn find_deleted(
        &self,
        pagination: PaginationParams,
    ) -> ProductResult<Vec<ProductDetails>> {
        let models = ProductsEntity::find()
            .filter(products::Column::DeletedAt.is_not_null())
            .order_by_asc(products::Column::Id)
            .offset(pagination.skip)
            .limit(pagination.take)
            .all(&self.db)
            .await?;

        load_details(&self.db, models).await
    }

    async fn find_deleted_by_id(&self, id: i32) -> ProductResult<Option<ProductDetails>> {
        let model = ProductsEntity::find_by_id(id)
            .filter(products::Column::DeletedAt.is_not_null())
            .one(&self.db)
            .await?;

        load_one(&self.db, model).await
    }

    async fn company_exists(&self, id: i32) -> ProductResult<bool> {
        let count = CompaniesEntity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }

    async fn create(&self, input: CreateProduct) -> ProductResult<ProductWithVariants> {
        let company_id = input
            .company_id
            .ok_or_else(|| ProductError::InvalidArgument("company_id is required".to_string()))?;

        let txn = self.db.begin().await?;

        let product = products::ActiveModel::for_create(company_id, &input)
            .insert(&txn)
            .await?;

        let mut variants = Vec::with_capacity(input.variants.len());
        for variant in input.variants {
            variants.push(insert_variant(&txn, product.id, variant).await?);
        }

        txn.commit().await?;

        tracing::info!(
            product_id = product.id,
            variants = variants.len(),
            "Created product"
        );
        Ok(ProductWithVariants {
            product: product.into(),
            variants,
        })
    }

    async fn update(&self, id: i32, input: UpdateProduct) -> ProductResult<Option<Product>> {
        if !self.atomic_updates {
            return update_product(&self.db, id, input).await;
        }

        let txn = self.db.begin().await?;
        let updated = update_product(&txn, id, input).await?;
        txn.commit().await?;
        Ok(updated)
    }

    async fn soft_delete(&self, id: i32) -> ProductResult<bool> {
        let result = ProductsEntity::update_many()
            .col_expr(products::Column::DeletedAt, Expr::current_timestamp())
            .filter(products::Column::Id.eq(id))
            .filter(products::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = id, "Soft deleted product");
        }
        Ok(result.rows_affected > 0)
    }

    async fn facet_counts(&self) -> ProductResult<ProductFacets> {
        let brands = BrandRow::find_by_statement(raw(BRAND_FACETS_SQL))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| BrandFacet {
                id: row.id,
                name: row.name,
                quantity: row.quantity,
            })
            .collect();

        let categories = CategoryRow::find_by_statement(raw(CATEGORY_FACETS_SQL))
            .all(&self.db)
            .await?
            .into_iter()
            .map(CategoryRow::into_facet)
            .collect::<ProductResult<Vec<_>>>()?;

        let types = NamedCountRow::find_by_statement(raw(TYPE_FACETS_SQL))
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        let genders = NamedCountRow::find_by_statement(raw(GENDER_FACETS_SQL))
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        let prompt_delivery = PromptDeliveryRow::find_by_statement(raw(PROMPT_DELIVERY_SQL))
            .one(&self.db)
            .await?
            .map(|row| PromptDeliveryCounts {
                with_prompt_delivery: row.with_prompt_delivery,
                without_prompt_delivery: row.without_prompt_delivery,
            })
            .unwrap_or_default();

        Ok(ProductFacets {
            brands,
            categories,
            types,
            genders,
            prompt_delivery,
        })
    }
}

// ===== Predicates =====

/// `deleted_at IS NULL`, at least one variant with no unpriced SKU, and the
/// optional search.
fn active_condition(search: Option<&str>) -> Condition {
    let mut condition = Condition::all()
        .add(products::Column::DeletedAt.is_null())
        .add(Expr::exists(priced_variant_query()));

    if let Some(term) = search.filter(|term| !term.is_empty()) {
        condition = condition.add(search_condition(term));
    }

    condition
}

/// Variants of the outer product for which no SKU lacks a price table.
fn priced_variant_query() -> SelectStatement {
    let price_link = Query::select()
        .expr(Expr::val(1))
        .from(price_tables_skus::Entity)
        .and_where(
            Expr::col((price_tables_skus::Entity, price_tables_skus::Column::SkuId))
                .equals((skus::Entity, skus::Column::Id)),
        )
        .to_owned();

    let unpriced_sku = Query::select()
        .expr(Expr::val(1))
        .from(skus::Entity)
        .and_where(
            Expr::col((skus::Entity, skus::Column::VariantId))
                .equals((variants::Entity, variants::Column::Id)),
        )
        .and_where(Expr::exists(price_link).not())
        .to_owned();

    Query::select()
        .expr(Expr::val(1))
        .from(variants::Entity)
        .and_where(
            Expr::col((variants::Entity, variants::Column::ProductId))
                .equals((products::Entity, products::Column::Id)),
        )
        .and_where(Expr::exists(unpriced_sku).not())
        .to_owned()
}

/// Case-insensitive substring match on name or description.
fn search_condition(term: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));

    Condition::any()
        .add(lower_like(products::Column::Name, &pattern))
        .add(lower_like(products::Column::Description, &pattern))
}

fn lower_like(column: products::Column, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col((products::Entity, column))))
        .like(LikeExpr::new(pattern).escape('\\'))
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// ===== Include graph =====

async fn load_one<C>(db: &C, model: Option<products::Model>) -> ProductResult<Option<ProductDetails>>
where
    C: ConnectionTrait,
{
    match model {
        Some(model) => Ok(load_details(db, vec![model]).await?.into_iter().next()),
        None => Ok(None),
    }
}

/// Batch-loads lookups, variants, SKUs and price tables for `models`,
/// keeping the order of `models` and of each child list by id.
async fn load_details<C>(db: &C, models: Vec<products::Model>) -> ProductResult<Vec<ProductDetails>>
where
    C: ConnectionTrait,
{
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let product_ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let brand_ids: BTreeSet<i32> = models.iter().map(|m| m.brand_id).collect();
    let category_ids: BTreeSet<i32> = models.iter().map(|m| m.category_id).collect();
    let subcategory_ids: BTreeSet<i32> = models.iter().filter_map(|m| m.subcategory_id).collect();

    let brands: HashMap<i32, Brand> = BrandsEntity::find()
        .filter(brands::Column::Id.is_in(brand_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|m| (m.id, m.into()))
        .collect();

    let categories: HashMap<i32, Category> = CategoriesEntity::find()
        .filter(categories::Column::Id.is_in(category_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|m| (m.id, m.into()))
        .collect();

    let subcategories: HashMap<i32, Subcategory> = if subcategory_ids.is_empty() {
        HashMap::new()
    } else {
        SubcategoriesEntity::find()
            .filter(subcategories::Column::Id.is_in(subcategory_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|m| (m.id, m.into()))
            .collect()
    };

    let variant_models = VariantsEntity::find()
        .filter(variants::Column::ProductId.is_in(product_ids))
        .order_by_asc(variants::Column::Id)
        .all(db)
        .await?;

    let mut skus_by_variant = load_skus(db, variant_models.iter().map(|v| v.id).collect()).await?;

    let mut variants_by_product: HashMap<i32, Vec<VariantDetails>> = HashMap::new();
    for model in variant_models {
        let skus = skus_by_variant.remove(&model.id).unwrap_or_default();
        variants_by_product
            .entry(model.product_id)
            .or_default()
            .push(VariantDetails {
                variant: model.into(),
                skus,
            });
    }

    let details = models
        .into_iter()
        .map(|model| ProductDetails {
            brands: brands.get(&model.brand_id).cloned(),
            categories: categories.get(&model.category_id).cloned(),
            subcategories: model
                .subcategory_id
                .and_then(|id| subcategories.get(&id).cloned()),
            variants: variants_by_product.remove(&model.id).unwrap_or_default(),
            product: model.into(),
        })
        .collect();

    Ok(details)
}

/// SKUs with their price tables, grouped by variant id.
async fn load_skus<C>(db: &C, variant_ids: Vec<i32>) -> ProductResult<HashMap<i32, Vec<SkuDetails>>>
where
    C: ConnectionTrait,
{
    if variant_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let sku_models = SkusEntity::find()
        .filter(skus::Column::VariantId.is_in(variant_ids))
        .order_by_asc(skus::Column::Id)
        .all(db)
        .await?;

    let sku_ids: Vec<i32> = sku_models.iter().map(|s| s.id).collect();
    let mut links_by_sku = load_price_table_links(db, sku_ids).await?;

    let mut skus_by_variant: HashMap<i32, Vec<SkuDetails>> = HashMap::new();
    for model in sku_models {
        let price_tables_skus = links_by_sku.remove(&model.id).unwrap_or_default();
        skus_by_variant
            .entry(model.variant_id)
            .or_default()
            .push(SkuDetails {
                sku: model.into(),
                price_tables_skus,
            });
    }

    Ok(skus_by_variant)
}

async fn load_price_table_links<C>(
    db: &C,
    sku_ids: Vec<i32>,
) -> ProductResult<HashMap<i32, Vec<PriceTableLink>>>
where
    C: ConnectionTrait,
{
    if sku_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let links = PriceTablesSkusEntity::find()
        .filter(price_tables_skus::Column::SkuId.is_in(sku_ids))
        .order_by_asc(price_tables_skus::Column::PriceTableId)
        .all(db)
        .await?;

    let table_ids: BTreeSet<i32> = links.iter().map(|l| l.price_table_id).collect();
    let tables: HashMap<i32, PriceTable> = if table_ids.is_empty() {
        HashMap::new()
    } else {
        PriceTablesEntity::find()
            .filter(price_tables::Column::Id.is_in(table_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|m| (m.id, m.into()))
            .collect()
    };

    let mut links_by_sku: HashMap<i32, Vec<PriceTableLink>> = HashMap::new();
    for link in links {
        if let Some(table) = tables.get(&link.price_table_id) {
            links_by_sku
                .entry(link.sku_id)
                .or_default()
                .push(PriceTableLink {
                    sku_id: link.sku_id,
                    price_table_id: link.price_table_id,
                    price_tables: table.clone(),
                });
        }
    }

    Ok(links_by_sku)
}

// ===== Writes =====

async fn insert_variant<C>(
    db: &C,
    product_id: i32,
    input: CreateVariant,
) -> ProductResult<VariantWithSkus>
where
    C: ConnectionTrait,
{
    let variant = variants::ActiveModel {
        name: Set(input.name),
        hex_code: Set(input.hex_code),
        product_id: Set(product_id),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let mut skus = Vec::with_capacity(input.skus.len());
    for sku_input in &input.skus {
        let sku = skus::ActiveModel::for_create(variant.id, sku_input)
            .insert(db)
            .await?;
        link_price_tables(db, sku.id, &sku_input.price_table_ids).await?;
        skus.push(sku.into());
    }

    Ok(VariantWithSkus {
        variant: variant.into(),
        skus,
    })
}

async fn link_price_tables<C>(db: &C, sku_id: i32, price_table_ids: &[i32]) -> ProductResult<()>
where
    C: ConnectionTrait,
{
    let unique: BTreeSet<i32> = price_table_ids.iter().copied().collect();
    if unique.is_empty() {
        return Ok(());
    }

    PriceTablesSkusEntity::insert_many(unique.into_iter().map(|price_table_id| {
        price_tables_skus::ActiveModel {
            sku_id: Set(sku_id),
            price_table_id: Set(price_table_id),
        }
    }))
    .exec_without_returning(db)
    .await?;

    Ok(())
}

async fn update_product<C>(db: &C, id: i32, mut input: UpdateProduct) -> ProductResult<Option<Product>>
where
    C: ConnectionTrait,
{
    let Some(existing) = ProductsEntity::find_by_id(id)
        .filter(products::Column::DeletedAt.is_null())
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let replacement = input.variants.take();

    let mut model: products::ActiveModel = existing.into();
    model.apply_update(input);
    let updated = model.update(db).await?;

    if let Some(replacement) = replacement {
        let removed = VariantsEntity::delete_many()
            .filter(variants::Column::ProductId.eq(id))
            .exec(db)
            .await?;

        let created = replacement.len();
        for variant in replacement {
            insert_variant(db, id, variant).await?;
        }

        tracing::info!(
            product_id = id,
            removed = removed.rows_affected,
            created,
            "Replaced product variants"
        );
    }

    Ok(Some(updated.into()))
}

// ===== Facet SQL =====

fn raw(sql: &str) -> Statement {
    Statement::from_string(DbBackend::Postgres, sql)
}

const BRAND_FACETS_SQL: &str = r#"
SELECT b.id, b.name, COUNT(p.id) AS quantity
FROM brands b
LEFT JOIN products p ON p.brand_id = b.id AND p.deleted_at IS NULL
GROUP BY b.id, b.name
ORDER BY b.id
"#;

const CATEGORY_FACETS_SQL: &str = r#"
SELECT
    c.name,
    COUNT(p.id) AS quantity,
    COALESCE(
        (
            SELECT json_agg(json_build_object('name', sub.name, 'quantity', sub.quantity) ORDER BY sub.id)
            FROM (
                SELECT sc.id, sc.name, COUNT(scp.id) AS quantity
                FROM subcategories sc
                LEFT JOIN products scp ON scp.subcategory_id = sc.id AND scp.deleted_at IS NULL
                WHERE sc.category_id = c.id
                GROUP BY sc.id, sc.name
            ) AS sub
        ),
        '[]'::json
    ) AS subcategories
FROM categories c
LEFT JOIN products p ON p.category_id = c.id AND p.deleted_at IS NULL
GROUP BY c.id, c.name
ORDER BY c.id
"#;

const TYPE_FACETS_SQL: &str = r#"
SELECT type::text AS name, COUNT(*) AS quantity
FROM products
WHERE deleted_at IS NULL
GROUP BY type
ORDER BY type
"#;

const GENDER_FACETS_SQL: &str = r#"
SELECT COALESCE(gender::text, '') AS name, COUNT(*) AS quantity
FROM products
WHERE deleted_at IS NULL
GROUP BY gender
ORDER BY gender NULLS LAST
"#;

const PROMPT_DELIVERY_SQL: &str = r#"
SELECT
    COUNT(*) FILTER (WHERE prompt_delivery) AS with_prompt_delivery,
    COUNT(*) FILTER (WHERE NOT prompt_delivery) AS without_prompt_delivery
FROM products
WHERE deleted_at IS NULL
"#;

#[derive(Debug, FromQueryResult)]
struct BrandRow {
    id: i32,
    name: String,
    quantity: i64,
}

#[derive(Debug, FromQueryResult)]
struct CategoryRow {
    name: String,
    quantity: i64,
    subcategories: serde_json::Value,
}

impl CategoryRow {
    fn into_facet(self) -> ProductResult<CategoryFacet> {
        let subcategories: Vec<SubcategoryCount> = serde_json::from_value(self.subcategories)
            .map_err(|e| {
                ProductError::Internal(format!("Malformed subcategory aggregate: {}", e))
            })?;

        Ok(CategoryFacet {
            name: self.name,
            quantity: self.quantity,
            subcategories: subcategories
                .into_iter()
                .map(|sub| NamedCount {
                    name: sub.name,
                    quantity: sub.quantity,
                })
                .collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct SubcategoryCount {
    name: String,
    quantity: i64,
}

#[derive(Debug, FromQueryResult)]
struct NamedCountRow {
    name: String,
    quantity: i64,
}

impl From<NamedCountRow> for NamedCount {
    fn from(row: NamedCountRow) -> Self {
        Self {
            name: row.name,
            quantity: row.quantity,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct PromptDeliveryRow {
    with_prompt_delivery: i64,
    without_prompt_delivery: i64,
}
