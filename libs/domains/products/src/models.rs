use chrono::{DateTime, Utc};
use regex::Regex;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::LazyLock;
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// `#rgb` or `#rrggbb`
static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}){1,2}$").unwrap());

fn validate_hex_code(value: &str) -> Result<(), validator::ValidationError> {
    if !HEX_COLOR.is_match(value) {
        return Err(validator::ValidationError::new("invalid_hex_code")
            .with_message("hex_code must look like #rgb or #rrggbb".into()));
    }
    Ok(())
}

/// Origin of a product
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "product_type")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    #[sea_orm(string_value = "NACIONAL")]
    Nacional,
    #[sea_orm(string_value = "IMPORTADO")]
    Importado,
}

/// Target audience of a product
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "product_gender")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    #[sea_orm(string_value = "MASCULINO")]
    Masculino,
    #[sea_orm(string_value = "FEMININO")]
    Feminino,
    #[sea_orm(string_value = "INFANTIL")]
    Infantil,
    #[sea_orm(string_value = "JUVENIL")]
    Juvenil,
    #[sea_orm(string_value = "UNISSEX")]
    Unissex,
    #[sea_orm(string_value = "FAT")]
    Fat,
    #[sea_orm(string_value = "OUTRO")]
    Outro,
}

/// Product row, without relations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i32,
    pub name: String,
    /// Business reference code
    pub reference: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub gender: Option<Gender>,
    pub prompt_delivery: bool,
    pub company_id: i32,
    pub brand_id: i32,
    pub category_id: i32,
    pub subcategory_id: Option<i32>,
    pub description: Option<String>,
    pub erp_id: Option<String>,
    pub deadline_id: Option<i32>,
    pub composition_data: Option<String>,
    pub technical_information: Option<String>,
    pub open_grid: Option<bool>,
    pub ipi: Option<f64>,
    pub is_discontinued: Option<bool>,
    pub is_launch: Option<bool>,
    pub is_visible: Option<bool>,
    pub colection: Option<String>,
    pub st: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the product has been soft deleted
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Brand {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Subcategory {
    pub id: i32,
    pub name: String,
    pub category_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceTable {
    pub id: i32,
    pub name: String,
}

/// Association between a SKU and one of its price tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceTableLink {
    pub sku_id: i32,
    pub price_table_id: i32,
    pub price_tables: PriceTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Variant {
    pub id: i32,
    pub name: String,
    pub hex_code: Option<String>,
    pub product_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Sku {
    pub id: i32,
    pub size: String,
    pub stock: i32,
    pub price: f64,
    pub code: String,
    pub min_quantity: i32,
    pub multiple_quantity: i32,
    #[serde(rename = "erpId")]
    pub erp_id: Option<String>,
    pub cest: Option<String>,
    pub ncm: Option<String>,
    pub height: Option<f64>,
    pub length: Option<f64>,
    pub weight: Option<f64>,
    pub width: Option<f64>,
    pub variant_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SkuDetails {
    #[serde(flatten)]
    pub sku: Sku,
    pub price_tables_skus: Vec<PriceTableLink>,
}

impl SkuDetails {
    /// Sorted, de-duplicated ids of the price tables this SKU belongs to.
    pub fn price_table_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self
            .price_tables_skus
            .iter()
            .map(|link| link.price_table_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VariantDetails {
    #[serde(flatten)]
    pub variant: Variant,
    pub skus: Vec<SkuDetails>,
}

/// Product with its lookups and the variant → SKU → price table graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductDetails {
    #[serde(flatten)]
    pub product: Product,
    pub brands: Option<Brand>,
    pub categories: Option<Category>,
    pub subcategories: Option<Subcategory>,
    pub variants: Vec<VariantDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VariantWithSkus {
    #[serde(flatten)]
    pub variant: Variant,
    pub skus: Vec<Sku>,
}

/// Result of a product creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductWithVariants {
    #[serde(flatten)]
    pub product: Product,
    pub variants: Vec<VariantWithSkus>,
}

/// DTO for one SKU inside a variant
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSku {
    #[validate(length(min = 1, max = 50, message = "size must have 1 to 50 characters"))]
    pub size: String,
    #[validate(range(min = 0, message = "stock must not be negative"))]
    #[serde(default)]
    pub stock: i32,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    #[validate(length(min = 1, max = 100, message = "code must have 1 to 100 characters"))]
    pub code: String,
    /// Defaults to 1
    #[validate(range(min = 1, message = "min_quantity must be at least 1"))]
    pub min_quantity: Option<i32>,
    /// Defaults to 1
    #[validate(range(min = 1, message = "multiple_quantity must be at least 1"))]
    pub multiple_quantity: Option<i32>,
    #[serde(rename = "erpId", alias = "erp_id")]
    pub erp_id: Option<String>,
    pub cest: Option<String>,
    pub ncm: Option<String>,
    #[validate(range(min = 0.0, message = "height must not be negative"))]
    pub height: Option<f64>,
    #[validate(range(min = 0.0, message = "length must not be negative"))]
    pub length: Option<f64>,
    #[validate(range(min = 0.0, message = "weight must not be negative"))]
    pub weight: Option<f64>,
    #[validate(range(min = 0.0, message = "width must not be negative"))]
    pub width: Option<f64>,
    /// Price tables to associate with the new SKU
    #[serde(default)]
    pub price_table_ids: Vec<i32>,
}

/// DTO for one variant with its SKUs
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateVariant {
    #[validate(length(min = 1, max = 100, message = "name must have 1 to 100 characters"))]
    pub name: String,
    #[validate(custom(function = "validate_hex_code"))]
    pub hex_code: Option<String>,
    #[validate(nested)]
    pub skus: Vec<CreateSku>,
}

/// DTO for creating a product together with its variants and SKUs
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200, message = "name must have 1 to 200 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "reference must have 1 to 100 characters"))]
    pub reference: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub gender: Option<Gender>,
    #[serde(default)]
    pub prompt_delivery: bool,
    /// Must reference an existing company
    pub company_id: Option<i32>,
    pub brand_id: i32,
    pub category_id: i32,
    pub subcategory_id: Option<i32>,
    pub description: Option<String>,
    pub erp_id: Option<String>,
    pub deadline_id: Option<i32>,
    pub composition_data: Option<String>,
    pub technical_information: Option<String>,
    pub open_grid: Option<bool>,
    #[validate(range(min = 0.0, message = "ipi must not be negative"))]
    pub ipi: Option<f64>,
    pub is_discontinued: Option<bool>,
    pub is_launch: Option<bool>,
    pub is_visible: Option<bool>,
    pub colection: Option<String>,
    #[validate(range(min = 0.0, message = "st must not be negative"))]
    pub st: Option<f64>,
    #[validate(nested)]
    #[serde(default)]
    pub variants: Vec<CreateVariant>,
}

/// DTO for updating a product
///
/// Absent fields are left untouched. Nullable columns take an explicit
/// `null` to clear them. When `variants` is present the product's variants
/// are replaced wholesale.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200, message = "name must have 1 to 200 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "reference must have 1 to 100 characters"))]
    pub reference: Option<String>,
    #[serde(rename = "type")]
    pub product_type: Option<ProductType>,
    #[serde(default, deserialize_with = "nullable")]
    pub gender: Option<Option<Gender>>,
    pub prompt_delivery: Option<bool>,
    pub company_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub category_id: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub subcategory_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub erp_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub deadline_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub composition_data: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub technical_information: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub open_grid: Option<Option<bool>>,
    #[validate(range(min = 0.0, message = "ipi must not be negative"))]
    #[serde(default, deserialize_with = "nullable")]
    pub ipi: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub is_discontinued: Option<Option<bool>>,
    #[serde(default, deserialize_with = "nullable")]
    pub is_launch: Option<Option<bool>>,
    #[serde(default, deserialize_with = "nullable")]
    pub is_visible: Option<Option<bool>>,
    #[serde(default, deserialize_with = "nullable")]
    pub colection: Option<Option<String>>,
    #[validate(range(min = 0.0, message = "st must not be negative"))]
    #[serde(default, deserialize_with = "nullable")]
    pub st: Option<Option<f64>>,
    #[validate(nested)]
    pub variants: Option<Vec<CreateVariant>>,
}

/// A present key becomes `Some`, so `null` reads as `Some(None)`.
/// Absent keys fall through to `#[serde(default)]`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Query parameters for listing and counting active products
///
/// `page` and `limit` that are absent, not numbers or below 1 fall back to
/// 1 and 10.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct ProductFilter {
    /// 1-based page number
    #[serde(default, deserialize_with = "lenient_u64")]
    pub page: Option<u64>,
    /// Page size
    #[serde(default, deserialize_with = "lenient_u64")]
    pub limit: Option<u64>,
    /// Case-insensitive substring of name or description
    pub search: Option<String>,
}

impl ProductFilter {
    /// The search term, if one was actually given.
    pub fn search_term(&self) -> Option<String> {
        self.search.clone().filter(|term| !term.is_empty())
    }
}

/// Query parameters for listing soft-deleted products
#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema, IntoParams)]
pub struct PageQuery {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub limit: Option<u64>,
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().parse().ok()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// ===== Facets =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BrandFacet {
    pub id: i32,
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NamedCount {
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryFacet {
    pub name: String,
    pub quantity: i64,
    pub subcategories: Vec<NamedCount>,
}

/// Active products split by the `prompt_delivery` flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PromptDeliveryCounts {
    #[serde(rename = "true")]
    pub with_prompt_delivery: i64,
    #[serde(rename = "false")]
    pub without_prompt_delivery: i64,
}

/// Aggregate counts of active products used to build UI filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductFacets {
    pub brands: Vec<BrandFacet>,
    pub categories: Vec<CategoryFacet>,
    pub types: Vec<NamedCount>,
    pub genders: Vec<NamedCount>,
    pub prompt_delivery: PromptDeliveryCounts,
}
