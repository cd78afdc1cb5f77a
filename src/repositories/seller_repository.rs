use metrics::counter;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::entities::seller::{
    ActiveModel as SellerActiveModel, Column, Entity as Seller, Model as SellerModel,
};
use crate::errors::{AppError, ServiceError};
use crate::repositories::{check_page, Repository};

use super::BaseRepository;

/// Input for a new seller row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSeller {
    pub name: String,
}

/// Repository for seller operations
#[derive(Debug, Clone)]
pub struct SellerRepository {
    base: BaseRepository,
}

impl SellerRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Insert a seller
    pub async fn create(&self, input: NewSeller) -> Result<SellerModel, AppError> {
        let seller = SellerActiveModel {
            name: Set(input.name),
            ..Default::default()
        };

        let created = seller.insert(self.base.get_db()).await.map_err(|e| {
            warn!(error = %e, "Seller insert rejected");
            ServiceError::from_db_err(e)
        })?;

        counter!("retail_db.rows_inserted", 1, "table" => "sellers");
        info!(seller_id = created.id, "Seller created");
        Ok(created)
    }

    /// Find a seller by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<SellerModel>, AppError> {
        debug!(seller_id = id, "Looking up seller");
        Seller::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Get all sellers with pagination
    pub async fn find_all(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<SellerModel>, u64), AppError> {
        check_page(page, page_size)?;

        let paginator = Seller::find()
            .order_by_asc(Column::Id)
            .paginate(self.base.get_db(), page_size);

        let total = paginator.num_items().await?;
        let sellers = paginator.fetch_page(page - 1).await?;

        Ok((sellers, total))
    }
}
