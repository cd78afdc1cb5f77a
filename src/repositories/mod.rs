use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::errors::AppError;

pub mod payment_repository;
pub mod product_repository;
pub mod return_repository;
pub mod sale_repository;
pub mod seller_repository;

pub use payment_repository::{NewPayment, PaymentRepository};
pub use product_repository::{NewProduct, ProductRepository};
pub use return_repository::{NewReturn, ReturnRepository};
pub use sale_repository::{NewSale, SaleRepository};
pub use seller_repository::{NewSeller, SellerRepository};

/// Repository trait for common database operations
pub trait Repository {
    fn get_db(&self) -> &DatabaseConnection;
}

#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: Arc<DatabaseConnection>,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl Repository for BaseRepository {
    fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Pages are 1-based; both the page number and its size must be positive.
pub(crate) fn check_page(page: u64, page_size: u64) -> Result<(), AppError> {
    if page == 0 {
        return Err(AppError::InvalidInput("page must be >= 1".to_string()));
    }
    if page_size == 0 {
        return Err(AppError::InvalidInput("page_size must be >= 1".to_string()));
    }
    Ok(())
}
