pub use sea_orm_migration::prelude::*;

mod m20250301_000000_create_catalog_lookups;
mod m20250301_000001_create_products;
mod m20250301_000002_create_variants_and_skus;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000000_create_catalog_lookups::Migration),
            Box::new(m20250301_000001_create_products::Migration),
            Box::new(m20250301_000002_create_variants_and_skus::Migration),
        ]
    }
}
