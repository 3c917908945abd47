use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::calendar;
use crate::db::DbPool;
use crate::entities::expense;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateExpenseRequest {
    #[validate(length(min = 1, message = "Expense name cannot be empty"))]
    pub name: String,
    pub amount: Decimal,
}

/// Cash expenses recorded against a cashier's day. Single-row writes, no
/// stock involvement, so no transaction wrapper here.
#[derive(Clone, Debug)]
pub struct ExpenseService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ExpenseService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request), fields(cashier_id = %cashier_id))]
    pub async fn create_expense(
        &self,
        cashier_id: Uuid,
        request: CreateExpenseRequest,
    ) -> Result<expense::Model, ServiceError> {
        request.validate()?;

        let created = expense::ActiveModel {
            id: Set(Uuid::new_v4()),
            cashier_id: Set(cashier_id),
            name: Set(request.name),
            amount: Set(request.amount),
            created_at: Set(Utc::now()),
        }
        .insert(self.db_pool.as_ref())
        .await?;

        info!(expense_id = %created.id, "Expense recorded");

        if let Err(e) = self
            .event_sender
            .send(Event::ExpenseRecorded(created.id))
            .await
        {
            tracing::warn!(error = %e, "Failed to send expense recorded event");
        }

        Ok(created)
    }

    #[instrument(skip(self), fields(expense_id = %expense_id))]
    pub async fn delete_expense(&self, expense_id: Uuid) -> Result<(), ServiceError> {
        let result = expense::Entity::delete_by_id(expense_id)
            .exec(self.db_pool.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Expense", expense_id));
        }
        Ok(())
    }

    /// Lists a cashier's expenses for one business day, newest first.
    #[instrument(skip(self), fields(cashier_id = %cashier_id))]
    pub async fn expenses_for_day(
        &self,
        cashier_id: Uuid,
        date: Option<&str>,
    ) -> Result<Vec<expense::Model>, ServiceError> {
        let bounds = calendar::business_day_bounds(date)?;

        Ok(expense::Entity::find()
            .filter(expense::Column::CashierId.eq(cashier_id))
            .filter(expense::Column::CreatedAt.between(bounds.start, bounds.end))
            .order_by_desc(expense::Column::CreatedAt)
            .all(self.db_pool.as_ref())
            .await?)
    }
}
