use chrono::{DateTime, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::entities::payment::{
    ActiveModel as PaymentActiveModel, Column, Entity as Payment, Model as PaymentModel,
    PaymentMethod,
};
use crate::errors::{AppError, ServiceError};
use crate::repositories::Repository;

use super::BaseRepository;

/// Input for a new payment row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayment {
    pub seller_id: i32,
    pub amount: Decimal,
    pub method: PaymentMethod,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Repository for payment operations
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    base: BaseRepository,
}

impl PaymentRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Record a payment for an existing seller
    pub async fn create(&self, input: NewPayment) -> Result<PaymentModel, AppError> {
        let mut payment = PaymentActiveModel {
            seller_id: Set(input.seller_id),
            amount: Set(input.amount),
            method: Set(input.method),
            ..Default::default()
        };
        if let Some(created_at) = input.created_at {
            payment.created_at = Set(created_at);
        }

        let created = payment.insert(self.base.get_db()).await.map_err(|e| {
            warn!(seller_id = input.seller_id, error = %e, "Payment insert rejected");
            ServiceError::from_db_err(e)
        })?;

        counter!("retail_db.rows_inserted", 1, "table" => "payments");
        info!(
            payment_id = created.id,
            seller_id = created.seller_id,
            method = %created.method,
            "Payment recorded"
        );
        Ok(created)
    }

    /// Find a payment by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<PaymentModel>, AppError> {
        debug!(payment_id = id, "Looking up payment");
        Payment::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Payments made to a seller, oldest first
    pub async fn find_by_seller(&self, seller_id: i32) -> Result<Vec<PaymentModel>, AppError> {
        Payment::find()
            .filter(Column::SellerId.eq(seller_id))
            .order_by_asc(Column::Id)
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }
}
