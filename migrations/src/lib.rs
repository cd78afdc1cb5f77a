pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_retail_tables;

pub use m20240101_000001_create_retail_tables::{Payments, Products, Returns, Sales, Sellers};

/// Method values accepted by `payments.method`.
pub const PAYMENT_METHODS: [&str; 2] = ["cash", "transfer"];

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_retail_tables::Migration)]
    }
}
