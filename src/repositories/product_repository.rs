use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::entities::product::{
    ActiveModel as ProductActiveModel, Column, Entity as Product, Model as ProductModel,
};
use crate::errors::{AppError, ServiceError};
use crate::repositories::{check_page, Repository};

use super::BaseRepository;

/// Input for a new product row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    /// Left out of the INSERT when `None`, so the column default (0) applies
    #[serde(default)]
    pub stock: Option<i32>,
}

/// Repository for product operations
#[derive(Debug, Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Insert a product
    pub async fn create(&self, input: NewProduct) -> Result<ProductModel, AppError> {
        let mut product = ProductActiveModel {
            name: Set(input.name),
            price: Set(input.price),
            ..Default::default()
        };
        if let Some(stock) = input.stock {
            product.stock = Set(stock);
        }

        let created = product.insert(self.base.get_db()).await.map_err(|e| {
            warn!(error = %e, "Product insert rejected");
            ServiceError::from_db_err(e)
        })?;

        counter!("retail_db.rows_inserted", 1, "table" => "products");
        info!(product_id = created.id, "Product created");
        Ok(created)
    }

    /// Find a product by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<ProductModel>, AppError> {
        debug!(product_id = id, "Looking up product");
        Product::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Get all products with pagination
    pub async fn find_all(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<ProductModel>, u64), AppError> {
        check_page(page, page_size)?;

        let paginator = Product::find()
            .order_by_asc(Column::Id)
            .paginate(self.base.get_db(), page_size);

        let total = paginator.num_items().await?;
        let products = paginator.fetch_page(page - 1).await?;

        Ok((products, total))
    }
}
