use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Variants::Table)
                    .if_not_exists()
                    .col(pk_auto(Variants::Id))
                    .col(string(Variants::Name))
                    .col(string_null(Variants::HexCode))
                    .col(integer(Variants::ProductId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_variants_product_id")
                            .from(Variants::Table, Variants::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_variants_product_id")
                    .table(Variants::Table)
                    .col(Variants::ProductId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Skus::Table)
                    .if_not_exists()
                    .col(pk_auto(Skus::Id))
                    .col(string(Skus::Size))
                    .col(integer(Skus::Stock).default(0))
                    .col(double(Skus::Price))
                    .col(string_uniq(Skus::Code))
                    .col(integer(Skus::MinQuantity).default(1))
                    .col(integer(Skus::MultipleQuantity).default(1))
                    .col(string_null(Skus::ErpId))
                    .col(string_null(Skus::Cest))
                    .col(string_null(Skus::Ncm))
                    .col(double_null(Skus::Height))
                    .col(double_null(Skus::Length))
                    .col(double_null(Skus::Weight))
                    .col(double_null(Skus::Width))
                    .col(integer(Skus::VariantId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_skus_variant_id")
                            .from(Skus::Table, Skus::VariantId)
                            .to(Variants::Table, Variants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_skus_variant_id")
                    .table(Skus::Table)
                    .col(Skus::VariantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PriceTablesSkus::Table)
                    .if_not_exists()
                    .col(integer(PriceTablesSkus::SkuId))
                    .col(integer(PriceTablesSkus::PriceTableId))
                    .primary_key(
                        Index::create()
                            .col(PriceTablesSkus::SkuId)
                            .col(PriceTablesSkus::PriceTableId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_price_tables_skus_sku_id")
                            .from(PriceTablesSkus::Table, PriceTablesSkus::SkuId)
                            .to(Skus::Table, Skus::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_price_tables_skus_price_table_id")
                            .from(PriceTablesSkus::Table, PriceTablesSkus::PriceTableId)
                            .to(PriceTables::Table, PriceTables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_price_tables_skus_price_table_id")
                    .table(PriceTablesSkus::Table)
                    .col(PriceTablesSkus::PriceTableId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PriceTablesSkus::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Skus::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Variants::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum PriceTables {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Variants {
    Table,
    Id,
    Name,
    HexCode,
    ProductId,
}

#[derive(DeriveIden)]
enum Skus {
    Table,
    Id,
    Size,
    Stock,
    Price,
    Code,
    MinQuantity,
    MultipleQuantity,
    ErpId,
    Cest,
    Ncm,
    Height,
    Length,
    Weight,
    Width,
    VariantId,
}

#[derive(DeriveIden)]
enum PriceTablesSkus {
    Table,
    SkuId,
    PriceTableId,
}
