use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(ProductType::Enum)
                    .values([ProductType::Nacional, ProductType::Importado])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(ProductGender::Enum)
                    .values(genders())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk_auto(Products::Id))
                    .col(string(Products::Name))
                    .col(string(Products::Reference))
                    .col(
                        ColumnDef::new(Products::Type)
                            .enumeration(
                                ProductType::Enum,
                                [ProductType::Nacional, ProductType::Importado],
                            )
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Products::Gender)
                            .enumeration(ProductGender::Enum, genders())
                            .null(),
                    )
                    .col(boolean(Products::PromptDelivery).default(false))
                    .col(integer(Products::CompanyId))
                    .col(integer(Products::BrandId))
                    .col(integer(Products::CategoryId))
                    .col(integer_null(Products::SubcategoryId))
                    .col(text_null(Products::Description))
                    .col(string_null(Products::ErpId))
                    .col(integer_null(Products::DeadlineId))
                    .col(text_null(Products::CompositionData))
                    .col(text_null(Products::TechnicalInformation))
                    .col(boolean_null(Products::OpenGrid))
                    .col(double_null(Products::Ipi))
                    .col(boolean_null(Products::IsDiscontinued))
                    .col(boolean_null(Products::IsLaunch))
                    .col(boolean_null(Products::IsVisible))
                    .col(string_null(Products::Colection))
                    .col(double_null(Products::St))
                    .col(
                        timestamp_with_time_zone(Products::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Products::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(Products::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_company_id")
                            .from(Products::Table, Products::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_brand_id")
                            .from(Products::Table, Products::BrandId)
                            .to(Brands::Table, Brands::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_category_id")
                            .from(Products::Table, Products::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_subcategory_id")
                            .from(Products::Table, Products::SubcategoryId)
                            .to(Subcategories::Table, Subcategories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_products_deleted_at", Products::DeletedAt),
            ("idx_products_brand_id", Products::BrandId),
            ("idx_products_category_id", Products::CategoryId),
            ("idx_products_subcategory_id", Products::SubcategoryId),
            ("idx_products_company_id", Products::CompanyId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Products::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(ProductGender::Enum).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(ProductType::Enum).to_owned())
            .await?;

        Ok(())
    }
}

fn genders() -> [ProductGender; 7] {
    [
        ProductGender::Masculino,
        ProductGender::Feminino,
        ProductGender::Infantil,
        ProductGender::Juvenil,
        ProductGender::Unissex,
        ProductGender::Fat,
        ProductGender::Outro,
    ]
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Name,
    Reference,
    Type,
    Gender,
    PromptDelivery,
    CompanyId,
    BrandId,
    CategoryId,
    SubcategoryId,
    Description,
    ErpId,
    DeadlineId,
    CompositionData,
    TechnicalInformation,
    OpenGrid,
    Ipi,
    IsDiscontinued,
    IsLaunch,
    IsVisible,
    Colection,
    St,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Brands {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Subcategories {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ProductType {
    #[sea_orm(iden = "product_type")]
    Enum,
    #[sea_orm(iden = "NACIONAL")]
    Nacional,
    #[sea_orm(iden = "IMPORTADO")]
    Importado,
}

#[derive(DeriveIden)]
enum ProductGender {
    #[sea_orm(iden = "product_gender")]
    Enum,
    #[sea_orm(iden = "MASCULINO")]
    Masculino,
    #[sea_orm(iden = "FEMININO")]
    Feminino,
    #[sea_orm(iden = "INFANTIL")]
    Infantil,
    #[sea_orm(iden = "JUVENIL")]
    Juvenil,
    #[sea_orm(iden = "UNISSEX")]
    Unissex,
    #[sea_orm(iden = "FAT")]
    Fat,
    #[sea_orm(iden = "OUTRO")]
    Outro,
}
