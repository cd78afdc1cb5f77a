use chrono::{DateTime, Utc};
use metrics::counter;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::entities::sale_return::{
    ActiveModel as SaleReturnActiveModel, Column, Entity as SaleReturn, Model as SaleReturnModel,
};
use crate::errors::{AppError, ServiceError};
use crate::repositories::Repository;

use super::BaseRepository;

/// Input for a new return row. The quantity is not compared with the sale's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReturn {
    pub sale_id: i32,
    pub quantity: i32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Repository for return operations
#[derive(Debug, Clone)]
pub struct ReturnRepository {
    base: BaseRepository,
}

impl ReturnRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Record a return against an existing sale
    pub async fn create(&self, input: NewReturn) -> Result<SaleReturnModel, AppError> {
        let mut sale_return = SaleReturnActiveModel {
            sale_id: Set(input.sale_id),
            quantity: Set(input.quantity),
            ..Default::default()
        };
        if let Some(created_at) = input.created_at {
            sale_return.created_at = Set(created_at);
        }

        let created = sale_return.insert(self.base.get_db()).await.map_err(|e| {
            warn!(sale_id = input.sale_id, error = %e, "Return insert rejected");
            ServiceError::from_db_err(e)
        })?;

        counter!("retail_db.rows_inserted", 1, "table" => "returns");
        info!(return_id = created.id, sale_id = created.sale_id, "Return recorded");
        Ok(created)
    }

    /// Find a return by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<SaleReturnModel>, AppError> {
        debug!(return_id = id, "Looking up return");
        SaleReturn::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Returns recorded against a sale, oldest first
    pub async fn find_by_sale(&self, sale_id: i32) -> Result<Vec<SaleReturnModel>, AppError> {
        SaleReturn::find()
            .filter(Column::SaleId.eq(sale_id))
            .order_by_asc(Column::Id)
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }
}
