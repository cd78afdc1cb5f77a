#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal::Decimal;
use retail_tracker::{
    db::{self, DbConfig, DbPool},
    entities::{ProductModel, SaleModel, SellerModel},
    repositories::{NewProduct, NewSale, NewSeller},
    Repositories,
};
use sea_orm::{ConnectionTrait, DbErr, ExecResult};
use tempfile::TempDir;

/// Fresh file-backed SQLite database with the retail schema applied.
pub struct TestDb {
    pub db: Arc<DbPool>,
    pub repos: Repositories,
    _dir: TempDir,
}

impl TestDb {
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("retail.db").display());

        let pool = db::establish_connection_with_config(&DbConfig {
            url,
            max_connections: 1,
            ..Default::default()
        })
        .await
        .expect("failed to open test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db = Arc::new(pool);
        let repos = Repositories::new(db.clone());

        Self {
            db,
            repos,
            _dir: dir,
        }
    }

    /// Runs a statement the way an external application would.
    pub async fn exec(&self, sql: &str) -> Result<ExecResult, DbErr> {
        self.db.execute_unprepared(sql).await
    }

    pub async fn seller(&self, name: &str) -> SellerModel {
        self.repos
            .sellers
            .create(NewSeller {
                name: name.to_string(),
            })
            .await
            .expect("create seller")
    }

    pub async fn product(&self, name: &str, price: Decimal) -> ProductModel {
        self.repos
            .products
            .create(NewProduct {
                name: name.to_string(),
                price,
                stock: None,
            })
            .await
            .expect("create product")
    }

    pub async fn sale(&self, seller_id: i32, product_id: i32, quantity: i32) -> SaleModel {
        self.repos
            .sales
            .create(NewSale {
                seller_id,
                product_id,
                quantity,
                total: Decimal::new(1000, 2) * Decimal::from(quantity),
                created_at: None,
            })
            .await
            .expect("create sale")
    }
}
