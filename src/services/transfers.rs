use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::calendar;
use crate::db::{transaction_with_timeout, DbPool};
use crate::entities::sheet::SheetKind;
use crate::entities::transfer::{self, TransferKind};
use crate::entities::{grid_row, kahon_item, product};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::grid;
use crate::services::stock::{self, TierRef};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransferRequest {
    pub product_id: Uuid,
    pub sack_price_id: Option<Uuid>,
    pub per_unit_price_id: Option<Uuid>,
    pub quantity: Decimal,
    pub kind: TransferKind,
}

/// What a transfer materialized as. Kahon transfers become a storage-box item
/// plus its grid row; every other kind is a standalone ledger record. Never
/// both.
#[derive(Debug, Serialize, Deserialize)]
pub enum TransferOutcome {
    Kahon {
        item: kahon_item::Model,
        row: grid_row::Model,
    },
    Ledger(transfer::Model),
}

/// Movement Ledger, transfer path.
#[derive(Clone, Debug)]
pub struct TransferService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    txn_timeout: Duration,
    default_sheet_columns: i32,
}

impl TransferService {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        txn_timeout: Duration,
        default_sheet_columns: i32,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            txn_timeout,
            default_sheet_columns,
        }
    }

    /// Moves stock out of a tier. The decrement and whichever record shape
    /// the kind calls for land in one bounded transaction.
    #[instrument(skip(self, request), fields(cashier_id = %cashier_id, kind = request.kind.as_str()))]
    pub async fn create_transfer(
        &self,
        cashier_id: Uuid,
        request: CreateTransferRequest,
    ) -> Result<TransferOutcome, ServiceError> {
        let columns = self.default_sheet_columns;
        let outcome =
            transaction_with_timeout(self.db_pool.as_ref(), self.txn_timeout, move |txn| {
                Box::pin(async move {
                    let tier = TierRef::from_ids(request.sack_price_id, request.per_unit_price_id)?;
                    let product_model = product::Entity::find_by_id(request.product_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| ServiceError::not_found("Product", request.product_id))?;

                    stock::decrement(txn, &tier, &request.quantity).await?;

                    let now = Utc::now();
                    // Sack moves count whole sacks; per-unit moves park the
                    // weight in the name and count 0.
                    let (item_quantity, item_name) = if tier.is_per_unit() {
                        (0, format!("{} ({} kg)", product_model.name, request.quantity))
                    } else {
                        (stock::sack_count(&request.quantity)?, product_model.name.clone())
                    };

                    if request.kind == TransferKind::Kahon {
                        let item = kahon_item::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            cashier_id: Set(cashier_id),
                            name: Set(item_name.clone()),
                            quantity: Set(item_quantity),
                            created_at: Set(now),
                        }
                        .insert(txn)
                        .await?;

                        let sheet_model = grid::get_or_create_sheet_on(
                            txn,
                            cashier_id,
                            SheetKind::Kahon,
                            columns,
                        )
                        .await?;
                        let row_index = grid::next_row_index(txn, sheet_model.id).await?;
                        let row = grid::insert_item_row_on(
                            txn,
                            &sheet_model,
                            item.id,
                            row_index,
                            item_quantity,
                            &item_name,
                        )
                        .await?;

                        Ok(TransferOutcome::Kahon { item, row })
                    } else {
                        let record = transfer::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            cashier_id: Set(cashier_id),
                            product_id: Set(request.product_id),
                            sack_price_id: Set(request.sack_price_id),
                            per_unit_price_id: Set(request.per_unit_price_id),
                            quantity: Set(request.quantity),
                            name: Set(item_name),
                            kind: Set(request.kind.as_str().to_string()),
                            created_at: Set(now),
                        }
                        .insert(txn)
                        .await?;

                        Ok(TransferOutcome::Ledger(record))
                    }
                })
            })
            .await?;

        let (record_id, kind) = match &outcome {
            TransferOutcome::Kahon { item, .. } => (item.id, TransferKind::Kahon),
            TransferOutcome::Ledger(record) => (record.id, request_kind(record)),
        };
        info!(record_id = %record_id, kind = kind.as_str(), "Transfer recorded");

        if let Err(e) = self
            .event_sender
            .send(Event::TransferCreated {
                transfer_id: record_id,
                kind: kind.as_str().to_string(),
            })
            .await
        {
            tracing::warn!(error = %e, "Failed to send transfer created event");
        }

        Ok(outcome)
    }

    /// Fetches one standalone transfer record.
    #[instrument(skip(self), fields(transfer_id = %transfer_id))]
    pub async fn get_transfer(&self, transfer_id: Uuid) -> Result<transfer::Model, ServiceError> {
        transfer::Entity::find_by_id(transfer_id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("Transfer", transfer_id))
    }

    /// Lists a cashier's transfer records for one business day, newest first.
    #[instrument(skip(self), fields(cashier_id = %cashier_id))]
    pub async fn transfers_for_day(
        &self,
        cashier_id: Uuid,
        date: Option<&str>,
    ) -> Result<Vec<transfer::Model>, ServiceError> {
        let bounds = calendar::business_day_bounds(date)?;

        Ok(transfer::Entity::find()
            .filter(transfer::Column::CashierId.eq(cashier_id))
            .filter(transfer::Column::CreatedAt.between(bounds.start, bounds.end))
            .order_by_desc(transfer::Column::CreatedAt)
            .all(self.db_pool.as_ref())
            .await?)
    }
}

fn request_kind(record: &transfer::Model) -> TransferKind {
    TransferKind::from_str(&record.kind).unwrap_or(TransferKind::OwnConsumption)
}
