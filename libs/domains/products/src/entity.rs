use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::{CreateProduct, CreateSku, Gender, ProductType, UpdateProduct};

// ===== Products =====

pub mod products {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "products")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub reference: String,
        #[sea_orm(column_name = "type")]
        pub product_type: ProductType,
        pub gender: Option<Gender>,
        pub prompt_delivery: bool,
        pub company_id: i32,
        pub brand_id: i32,
        pub category_id: i32,
        pub subcategory_id: Option<i32>,
        #[sea_orm(column_type = "Text", nullable)]
        pub description: Option<String>,
        pub erp_id: Option<String>,
        pub deadline_id: Option<i32>,
        #[sea_orm(column_type = "Text", nullable)]
        pub composition_data: Option<String>,
        #[sea_orm(column_type = "Text", nullable)]
        pub technical_information: Option<String>,
        pub open_grid: Option<bool>,
        #[sea_orm(column_type = "Double", nullable)]
        pub ipi: Option<f64>,
        pub is_discontinued: Option<bool>,
        pub is_launch: Option<bool>,
        pub is_visible: Option<bool>,
        pub colection: Option<String>,
        #[sea_orm(column_type = "Double", nullable)]
        pub st: Option<f64>,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
        pub deleted_at: Option<DateTimeWithTimeZone>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::companies::Entity",
            from = "Column::CompanyId",
            to = "super::companies::Column::Id"
        )]
        Company,
        #[sea_orm(
            belongs_to = "super::brands::Entity",
            from = "Column::BrandId",
            to = "super::brands::Column::Id"
        )]
        Brand,
        #[sea_orm(
            belongs_to = "super::categories::Entity",
            from = "Column::CategoryId",
            to = "super::categories::Column::Id"
        )]
        Category,
        #[sea_orm(
            belongs_to = "super::subcategories::Entity",
            from = "Column::SubcategoryId",
            to = "super::subcategories::Column::Id"
        )]
        Subcategory,
        #[sea_orm(has_many = "super::variants::Entity")]
        Variants,
    }

    impl Related<super::companies::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Company.def()
        }
    }

    impl Related<super::brands::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Brand.def()
        }
    }

    impl Related<super::categories::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Category.def()
        }
    }

    impl Related<super::subcategories::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Subcategory.def()
        }
    }

    impl Related<super::variants::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Variants.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Product {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                name: model.name,
                reference: model.reference,
                product_type: model.product_type,
                gender: model.gender,
                prompt_delivery: model.prompt_delivery,
                company_id: model.company_id,
                brand_id: model.brand_id,
                category_id: model.category_id,
                subcategory_id: model.subcategory_id,
                description: model.description,
                erp_id: model.erp_id,
                deadline_id: model.deadline_id,
                composition_data: model.composition_data,
                technical_information: model.technical_information,
                open_grid: model.open_grid,
                ipi: model.ipi,
                is_discontinued: model.is_discontinued,
                is_launch: model.is_launch,
                is_visible: model.is_visible,
                colection: model.colection,
                st: model.st,
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
                deleted_at: model.deleted_at.map(Into::into),
            }
        }
    }

    impl ActiveModel {
        /// Insertable row for a new product. Variants are inserted separately.
        pub fn for_create(company_id: i32, input: &CreateProduct) -> Self {
            let now = Utc::now();
            ActiveModel {
                name: Set(input.name.clone()),
                reference: Set(input.reference.clone()),
                product_type: Set(input.product_type),
                gender: Set(input.gender),
                prompt_delivery: Set(input.prompt_delivery),
                company_id: Set(company_id),
                brand_id: Set(input.brand_id),
                category_id: Set(input.category_id),
                subcategory_id: Set(input.subcategory_id),
                description: Set(input.description.clone()),
                erp_id: Set(input.erp_id.clone()),
                deadline_id: Set(input.deadline_id),
                composition_data: Set(input.composition_data.clone()),
                technical_information: Set(input.technical_information.clone()),
                open_grid: Set(input.open_grid),
                ipi: Set(input.ipi),
                is_discontinued: Set(input.is_discontinued),
                is_launch: Set(input.is_launch),
                is_visible: Set(input.is_visible),
                colection: Set(input.colection.clone()),
                st: Set(input.st),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
                deleted_at: Set(None),
                ..Default::default()
            }
        }

        /// Sets every scalar field present in `input`, clearing nullable
        /// columns sent as `null`, and bumps `updated_at`.
        /// `input.variants` is ignored.
        pub fn apply_update(&mut self, input: UpdateProduct) {
            if let Some(name) = input.name {
                self.name = Set(name);
            }
            if let Some(reference) = input.reference {
                self.reference = Set(reference);
            }
            if let Some(product_type) = input.product_type {
                self.product_type = Set(product_type);
            }
            if let Some(gender) = input.gender {
                self.gender = Set(gender);
            }
            if let Some(prompt_delivery) = input.prompt_delivery {
                self.prompt_delivery = Set(prompt_delivery);
            }
            if let Some(company_id) = input.company_id {
                self.company_id = Set(company_id);
            }
            if let Some(brand_id) = input.brand_id {
                self.brand_id = Set(brand_id);
            }
            if let Some(category_id) = input.category_id {
                self.category_id = Set(category_id);
            }
            if let Some(subcategory_id) = input.subcategory_id {
                self.subcategory_id = Set(subcategory_id);
            }
            if let Some(description) = input.description {
                self.description = Set(description);
            }
            if let Some(erp_id) = input.erp_id {
                self.erp_id = Set(erp_id);
            }
            if let Some(deadline_id) = input.deadline_id {
                self.deadline_id = Set(deadline_id);
            }
            if let Some(composition_data) = input.composition_data {
                self.composition_data = Set(composition_data);
            }
            if let Some(technical_information) = input.technical_information {
                self.technical_information = Set(technical_information);
            }
            if let Some(open_grid) = input.open_grid {
                self.open_grid = Set(open_grid);
            }
            if let Some(ipi) = input.ipi {
                self.ipi = Set(ipi);
            }
            if let Some(is_discontinued) = input.is_discontinued {
                self.is_discontinued = Set(is_discontinued);
            }
            if let Some(is_launch) = input.is_launch {
                self.is_launch = Set(is_launch);
            }
            if let Some(is_visible) = input.is_visible {
                self.is_visible = Set(is_visible);
            }
            if let Some(colection) = input.colection {
                self.colection = Set(colection);
            }
            if let Some(st) = input.st {
                self.st = Set(st);
            }
            self.updated_at = Set(Utc::now().into());
        }
    }
}

// ===== Variants =====

pub mod variants {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "variants")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub hex_code: Option<String>,
        pub product_id: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::products::Entity",
            from = "Column::ProductId",
            to = "super::products::Column::Id",
            on_delete = "Cascade"
        )]
        Product,
        #[sea_orm(has_many = "super::skus::Entity")]
        Skus,
    }

    impl Related<super::products::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Product.def()
        }
    }

    impl Related<super::skus::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Skus.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Variant {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                name: model.name,
                hex_code: model.hex_code,
                product_id: model.product_id,
            }
        }
    }
}

// ===== SKUs =====

pub mod skus {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "skus")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub size: String,
        pub stock: i32,
        #[sea_orm(column_type = "Double")]
        pub price: f64,
        #[sea_orm(unique)]
        pub code: String,
        pub min_quantity: i32,
        pub multiple_quantity: i32,
        pub erp_id: Option<String>,
        pub cest: Option<String>,
        pub ncm: Option<String>,
        #[sea_orm(column_type = "Double", nullable)]
        pub height: Option<f64>,
        #[sea_orm(column_type = "Double", nullable)]
        pub length: Option<f64>,
        #[sea_orm(column_type = "Double", nullable)]
        pub weight: Option<f64>,
        #[sea_orm(column_type = "Double", nullable)]
        pub width: Option<f64>,
        pub variant_id: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::variants::Entity",
            from = "Column::VariantId",
            to = "super::variants::Column::Id",
            on_delete = "Cascade"
        )]
        Variant,
        #[sea_orm(has_many = "super::price_tables_skus::Entity")]
        PriceTablesSkus,
    }

    impl Related<super::variants::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Variant.def()
        }
    }

    impl Related<super::price_tables_skus::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::PriceTablesSkus.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Sku {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                size: model.size,
                stock: model.stock,
                price: model.price,
                code: model.code,
                min_quantity: model.min_quantity,
                multiple_quantity: model.multiple_quantity,
                erp_id: model.erp_id,
                cest: model.cest,
                ncm: model.ncm,
                height: model.height,
                length: model.length,
                weight: model.weight,
                width: model.width,
                variant_id: model.variant_id,
            }
        }
    }

    impl ActiveModel {
        /// Insertable row for a SKU of `variant_id`; quantities default to 1.
        pub fn for_create(variant_id: i32, input: &CreateSku) -> Self {
            ActiveModel {
                size: Set(input.size.clone()),
                stock: Set(input.stock),
                price: Set(input.price),
                code: Set(input.code.clone()),
                min_quantity: Set(input.min_quantity.unwrap_or(1)),
                multiple_quantity: Set(input.multiple_quantity.unwrap_or(1)),
                erp_id: Set(input.erp_id.clone()),
                cest: Set(input.cest.clone()),
                ncm: Set(input.ncm.clone()),
                height: Set(input.height),
                length: Set(input.length),
                weight: Set(input.weight),
                width: Set(input.width),
                variant_id: Set(variant_id),
                ..Default::default()
            }
        }
    }
}

// ===== Price table associations =====

pub mod price_tables_skus {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "price_tables_skus")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub sku_id: i32,
        #[sea_orm(primary_key, auto_increment = false)]
        pub price_table_id: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::skus::Entity",
            from = "Column::SkuId",
            to = "super::skus::Column::Id",
            on_delete = "Cascade"
        )]
        Sku,
        #[sea_orm(
            belongs_to = "super::price_tables::Entity",
            from = "Column::PriceTableId",
            to = "super::price_tables::Column::Id",
            on_delete = "Cascade"
        )]
        PriceTable,
    }

    impl Related<super::skus::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Sku.def()
        }
    }

    impl Related<super::price_tables::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::PriceTable.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

// ===== Lookups =====

pub mod price_tables {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "price_tables")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::price_tables_skus::Entity")]
        PriceTablesSkus,
    }

    impl Related<super::price_tables_skus::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::PriceTablesSkus.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::PriceTable {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                name: model.name,
            }
        }
    }
}

pub mod brands {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "brands")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::products::Entity")]
        Products,
    }

    impl Related<super::products::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Products.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Brand {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                name: model.name,
            }
        }
    }
}

pub mod categories {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "categories")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::products::Entity")]
        Products,
        #[sea_orm(has_many = "super::subcategories::Entity")]
        Subcategories,
    }

    impl Related<super::products::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Products.def()
        }
    }

    impl Related<super::subcategories::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Subcategories.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Category {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                name: model.name,
            }
        }
    }
}

pub mod subcategories {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "subcategories")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub category_id: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::categories::Entity",
            from = "Column::CategoryId",
            to = "super::categories::Column::Id",
            on_delete = "Cascade"
        )]
        Category,
        #[sea_orm(has_many = "super::products::Entity")]
        Products,
    }

    impl Related<super::categories::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Category.def()
        }
    }

    impl Related<super::products::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Products.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Subcategory {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                name: model.name,
                category_id: model.category_id,
            }
        }
    }
}

pub mod companies {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "companies")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::products::Entity")]
        Products,
    }

    impl Related<super::products::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Products.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub use brands::Entity as BrandsEntity;
pub use categories::Entity as CategoriesEntity;
pub use companies::Entity as CompaniesEntity;
pub use price_tables::Entity as PriceTablesEntity;
pub use price_tables_skus::Entity as PriceTablesSkusEntity;
pub use products::Entity as ProductsEntity;
pub use skus::Entity as SkusEntity;
pub use subcategories::Entity as SubcategoriesEntity;
pub use variants::Entity as VariantsEntity;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UpdateProduct;
    use sea_orm::ActiveValue;

    #[test]
    fn test_apply_update_only_touches_present_fields() {
        let mut model = products::ActiveModel {
            name: ActiveValue::Unchanged("Old".to_string()),
            reference: ActiveValue::Unchanged("REF".to_string()),
            ..Default::default()
        };

        model.apply_update(UpdateProduct {
            name: Some("New".to_string()),
            description: Some(Some("Soft cotton".to_string())),
            ..Default::default()
        });

        assert_eq!(model.name, Set("New".to_string()));
        assert_eq!(model.description, Set(Some("Soft cotton".to_string())));
        assert_eq!(model.reference, ActiveValue::Unchanged("REF".to_string()));
        assert!(matches!(model.updated_at, ActiveValue::Set(_)));
    }

    #[test]
    fn test_apply_update_clears_nullable_columns() {
        let mut model = products::ActiveModel {
            description: ActiveValue::Unchanged(Some("old".to_string())),
            subcategory_id: ActiveValue::Unchanged(Some(4)),
            erp_id: ActiveValue::Unchanged(Some("E-1".to_string())),
            ..Default::default()
        };
        let update: UpdateProduct = serde_json::from_value(serde_json::json!({
            "description": null,
            "subcategory_id": null,
        }))
        .unwrap();

        model.apply_update(update);

        assert_eq!(model.description, Set(None));
        assert_eq!(model.subcategory_id, Set(None));
        assert_eq!(model.erp_id, ActiveValue::Unchanged(Some("E-1".to_string())));
    }

    #[test]
    fn test_product_company_relation() {
        let to_company = <products::Entity as Related<companies::Entity>>::to();
        assert!(matches!(to_company.rel_type, sea_orm::RelationType::HasOne));

        let to_products = companies::Relation::Products.def();
        assert!(matches!(to_products.rel_type, sea_orm::RelationType::HasMany));
    }

    #[test]
    fn test_sku_quantities_default_to_one() {
        let input: CreateSku =
            serde_json::from_value(serde_json::json!({ "size": "P", "price": 1.0, "code": "C1" }))
                .unwrap();

        let model = skus::ActiveModel::for_create(9, &input);

        assert_eq!(model.min_quantity, Set(1));
        assert_eq!(model.multiple_quantity, Set(1));
        assert_eq!(model.variant_id, Set(9));
        assert_eq!(model.erp_id, Set(None));
    }
}
