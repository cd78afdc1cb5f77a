//! Retail tracker library
//!
//! Relational schema and typed data access for products, sellers, sales,
//! returns and payments. The schema itself lives in the `migrations` crate;
//! this crate adds the sea-orm entities, repositories, configuration and
//! connection handling around it.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod repositories;
pub mod schema;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use repositories::{
    PaymentRepository, ProductRepository, ReturnRepository, SaleRepository, SellerRepository,
};

/// Every repository over one shared connection pool
#[derive(Debug, Clone)]
pub struct Repositories {
    pub products: ProductRepository,
    pub sellers: SellerRepository,
    pub sales: SaleRepository,
    pub returns: ReturnRepository,
    pub payments: PaymentRepository,
}

impl Repositories {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            products: ProductRepository::new(db.clone()),
            sellers: SellerRepository::new(db.clone()),
            sales: SaleRepository::new(db.clone()),
            returns: ReturnRepository::new(db.clone()),
            payments: PaymentRepository::new(db),
        }
    }
}
