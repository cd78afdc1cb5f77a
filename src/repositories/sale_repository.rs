use chrono::{DateTime, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::entities::sale::{
    ActiveModel as SaleActiveModel, Column, Entity as Sale, Model as SaleModel,
};
use crate::entities::sale_return::{Entity as SaleReturn, Model as SaleReturnModel};
use crate::errors::{AppError, ServiceError};
use crate::repositories::{check_page, Repository};

use super::BaseRepository;

/// Input for a new sale row.
///
/// Stock is not checked or adjusted and `total` is stored as given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSale {
    pub seller_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub total: Decimal,
    /// Defaults to the insert time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Repository for sale operations
#[derive(Debug, Clone)]
pub struct SaleRepository {
    base: BaseRepository,
}

impl SaleRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Record a sale. Fails with `ForeignKeyViolation` when the seller or product is missing.
    pub async fn create(&self, input: NewSale) -> Result<SaleModel, AppError> {
        let mut sale = SaleActiveModel {
            seller_id: Set(input.seller_id),
            product_id: Set(input.product_id),
            quantity: Set(input.quantity),
            total: Set(input.total),
            ..Default::default()
        };
        if let Some(created_at) = input.created_at {
            sale.created_at = Set(created_at);
        }

        let created = sale.insert(self.base.get_db()).await.map_err(|e| {
            warn!(
                seller_id = input.seller_id,
                product_id = input.product_id,
                error = %e,
                "Sale insert rejected"
            );
            ServiceError::from_db_err(e)
        })?;

        counter!("retail_db.rows_inserted", 1, "table" => "sales");
        info!(
            sale_id = created.id,
            seller_id = created.seller_id,
            product_id = created.product_id,
            "Sale recorded"
        );
        Ok(created)
    }

    /// Find a sale by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<SaleModel>, AppError> {
        debug!(sale_id = id, "Looking up sale");
        Sale::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Find a sale together with every return recorded against it
    pub async fn find_with_returns(
        &self,
        id: i32,
    ) -> Result<Option<(SaleModel, Vec<SaleReturnModel>)>, AppError> {
        let mut rows = Sale::find_by_id(id)
            .find_with_related(SaleReturn)
            .all(self.base.get_db())
            .await?;

        Ok(rows.pop())
    }

    /// Sales recorded by a seller, oldest first
    pub async fn find_by_seller(&self, seller_id: i32) -> Result<Vec<SaleModel>, AppError> {
        Sale::find()
            .filter(Column::SellerId.eq(seller_id))
            .order_by_asc(Column::Id)
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Sales of a product, oldest first
    pub async fn find_by_product(&self, product_id: i32) -> Result<Vec<SaleModel>, AppError> {
        Sale::find()
            .filter(Column::ProductId.eq(product_id))
            .order_by_asc(Column::Id)
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Get all sales with pagination
    pub async fn find_all(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<SaleModel>, u64), AppError> {
        self.fetch_page(Sale::find(), page, page_size).await
    }

    /// One page of a seller's sales, oldest first, with the seller's total sale count
    pub async fn find_by_seller_paginated(
        &self,
        seller_id: i32,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<SaleModel>, u64), AppError> {
        self.fetch_page(
            Sale::find().filter(Column::SellerId.eq(seller_id)),
            page,
            page_size,
        )
        .await
    }

    async fn fetch_page(
        &self,
        query: Select<Sale>,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<SaleModel>, u64), AppError> {
        check_page(page, page_size)?;

        let paginator = query
            .order_by_asc(Column::Id)
            .paginate(self.base.get_db(), page_size);

        let total = paginator.num_items().await?;
        let sales = paginator.fetch_page(page - 1).await?;

        Ok((sales, total))
    }
}
