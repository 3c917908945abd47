use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::calendar;
use crate::db::{transaction_with_timeout, DbPool};
use crate::entities::sale::{self, PaymentMethod};
use crate::entities::{sale_item, special_price};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::orders;
use crate::services::stock::{self, TierRef};

/// One line of a sale request. References exactly one tier of the product;
/// `unit_price` freezes the price charged at sale time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItemInput {
    pub product_id: Uuid,
    pub sack_price_id: Option<Uuid>,
    pub per_unit_price_id: Option<Uuid>,
    pub quantity: Decimal,
    pub unit_price: Option<Decimal>,
    pub discounted_price: Option<Decimal>,
    #[serde(default)]
    pub is_special_price: bool,
    #[serde(default)]
    pub is_discounted: bool,
}

impl SaleItemInput {
    fn tier(&self) -> Result<TierRef, ServiceError> {
        TierRef::from_ids(self.sack_price_id, self.per_unit_price_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSaleRequest {
    pub payment_method: PaymentMethod,
    pub total_amount: Decimal,
    /// Order this sale fulfils, if any
    pub order_id: Option<Uuid>,
    #[validate(length(min = 1, message = "A sale needs at least one line item"))]
    pub items: Vec<SaleItemInput>,
}

/// A sale edit is a full replace of header and items, not a diff.
pub type UpdateSaleRequest = CreateSaleRequest;

#[derive(Debug, Serialize, Deserialize)]
pub struct SaleItemResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub sack_price_id: Option<Uuid>,
    pub per_unit_price_id: Option<Uuid>,
    pub quantity: Decimal,
    pub unit_price: Option<Decimal>,
    pub discounted_price: Option<Decimal>,
    pub is_special_price: bool,
    pub is_discounted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaleResponse {
    pub id: Uuid,
    pub cashier_id: Uuid,
    pub payment_method: String,
    pub total_amount: Decimal,
    pub order_id: Option<Uuid>,
    pub voided: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub items: Vec<SaleItemResponse>,
}

/// Movement Ledger, sale path.
///
/// Every mutation pairs its stock adjustments with the sale rows inside one
/// bounded transaction: a failure or timeout anywhere rolls back the stock
/// decrements together with the partial sale.
#[derive(Clone, Debug)]
pub struct SaleService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    txn_timeout: Duration,
}

impl SaleService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, txn_timeout: Duration) -> Self {
        Self {
            db_pool,
            event_sender,
            txn_timeout,
        }
    }

    /// Creates a sale: decrements each line's tier counter, persists the sale
    /// and its items, and completes a linked order, all atomically.
    #[instrument(skip(self, request), fields(cashier_id = %cashier_id))]
    pub async fn create_sale(
        &self,
        cashier_id: Uuid,
        request: CreateSaleRequest,
    ) -> Result<SaleResponse, ServiceError> {
        request.validate()?;

        let sale_id = Uuid::new_v4();
        let (sale_model, item_models) =
            transaction_with_timeout(self.db_pool.as_ref(), self.txn_timeout, move |txn| {
                Box::pin(async move {
                    let now = Utc::now();

                    for item in &request.items {
                        stock::decrement(txn, &item.tier()?, &item.quantity).await?;
                    }

                    let sale_model = sale::ActiveModel {
                        id: Set(sale_id),
                        cashier_id: Set(cashier_id),
                        payment_method: Set(request.payment_method.as_str().to_string()),
                        total_amount: Set(request.total_amount),
                        order_id: Set(request.order_id),
                        voided: Set(false),
                        created_at: Set(now),
                        updated_at: Set(None),
                    }
                    .insert(txn)
                    .await?;

                    let item_models = insert_items(txn, sale_id, &request.items, now).await?;

                    if let Some(order_id) = request.order_id {
                        orders::complete_order(txn, order_id, sale_id).await?;
                    }

                    Ok((sale_model, item_models))
                })
            })
            .await?;

        info!(sale_id = %sale_id, items = item_models.len(), "Sale created");

        if let Err(e) = self.event_sender.send(Event::SaleCreated(sale_id)).await {
            tracing::warn!(error = %e, sale_id = %sale_id, "Failed to send sale created event");
        }

        Ok(to_response(sale_model, item_models))
    }

    /// Replaces a sale wholesale: restores stock for every existing item,
    /// deletes them, applies the new items, and updates the header and order
    /// linkage. Running restore and reapply in one transaction means there is
    /// never a visible moment where stock reflects neither the old nor the
    /// new state.
    #[instrument(skip(self, request), fields(sale_id = %sale_id))]
    pub async fn update_sale(
        &self,
        sale_id: Uuid,
        request: UpdateSaleRequest,
    ) -> Result<SaleResponse, ServiceError> {
        request.validate()?;

        let (sale_model, item_models) =
            transaction_with_timeout(self.db_pool.as_ref(), self.txn_timeout, move |txn| {
                Box::pin(async move {
                    let existing = sale::Entity::find_by_id(sale_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| ServiceError::not_found("Sale", sale_id))?;

                    restore_item_stock(txn, sale_id).await?;
                    sale_item::Entity::delete_many()
                        .filter(sale_item::Column::SaleId.eq(sale_id))
                        .exec(txn)
                        .await?;

                    let now = Utc::now();
                    for item in &request.items {
                        stock::decrement(txn, &item.tier()?, &item.quantity).await?;
                    }
                    let item_models = insert_items(txn, sale_id, &request.items, now).await?;

                    // Re-point the order linkage only when it actually changed.
                    let previous_order = existing.order_id;
                    if previous_order != request.order_id {
                        if let Some(old_order) = previous_order {
                            orders::revert_order(txn, old_order).await?;
                        }
                        if let Some(new_order) = request.order_id {
                            orders::complete_order(txn, new_order, sale_id).await?;
                        }
                    }

                    let mut active: sale::ActiveModel = existing.into();
                    active.payment_method = Set(request.payment_method.as_str().to_string());
                    active.total_amount = Set(request.total_amount);
                    active.order_id = Set(request.order_id);
                    active.updated_at = Set(Some(now));
                    let sale_model = active.update(txn).await?;

                    Ok((sale_model, item_models))
                })
            })
            .await?;

        info!(sale_id = %sale_id, "Sale updated");

        if let Err(e) = self.event_sender.send(Event::SaleUpdated(sale_id)).await {
            tracing::warn!(error = %e, sale_id = %sale_id, "Failed to send sale updated event");
        }

        Ok(to_response(sale_model, item_models))
    }

    /// Deletes a sale: restores every item's stock, reverts a linked order to
    /// pending, then removes the sale and its items.
    #[instrument(skip(self), fields(sale_id = %sale_id))]
    pub async fn delete_sale(&self, sale_id: Uuid) -> Result<(), ServiceError> {
        transaction_with_timeout(self.db_pool.as_ref(), self.txn_timeout, move |txn| {
            Box::pin(async move {
                let existing = sale::Entity::find_by_id(sale_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("Sale", sale_id))?;

                restore_item_stock(txn, sale_id).await?;

                if let Some(order_id) = existing.order_id {
                    orders::revert_order(txn, order_id).await?;
                }

                sale_item::Entity::delete_many()
                    .filter(sale_item::Column::SaleId.eq(sale_id))
                    .exec(txn)
                    .await?;
                sale::Entity::delete_by_id(sale_id).exec(txn).await?;

                Ok(())
            })
        })
        .await?;

        info!(sale_id = %sale_id, "Sale deleted, stock restored");

        if let Err(e) = self.event_sender.send(Event::SaleDeleted(sale_id)).await {
            tracing::warn!(error = %e, sale_id = %sale_id, "Failed to send sale deleted event");
        }

        Ok(())
    }

    /// Flags a sale as voided. The void flag only affects reporting; stock
    /// is restored by [`delete_sale`], not by voiding.
    #[instrument(skip(self), fields(sale_id = %sale_id))]
    pub async fn void_sale(&self, sale_id: Uuid) -> Result<SaleResponse, ServiceError> {
        let db = self.db_pool.as_ref();

        let existing = sale::Entity::find_by_id(sale_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Sale", sale_id))?;

        let mut active: sale::ActiveModel = existing.into();
        active.voided = Set(true);
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(db).await?;

        let items = self.items_for(sale_id).await?;
        Ok(to_response(updated, items))
    }

    /// Fetches one sale with its items.
    #[instrument(skip(self), fields(sale_id = %sale_id))]
    pub async fn get_sale(&self, sale_id: Uuid) -> Result<SaleResponse, ServiceError> {
        let sale_model = sale::Entity::find_by_id(sale_id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("Sale", sale_id))?;

        let items = self.items_for(sale_id).await?;
        Ok(to_response(sale_model, items))
    }

    /// Lists a cashier's sales for one business day, newest first.
    #[instrument(skip(self), fields(cashier_id = %cashier_id))]
    pub async fn sales_for_day(
        &self,
        cashier_id: Uuid,
        date: Option<&str>,
    ) -> Result<Vec<SaleResponse>, ServiceError> {
        let bounds = calendar::business_day_bounds(date)?;

        let day_sales = sale::Entity::find()
            .filter(sale::Column::CashierId.eq(cashier_id))
            .filter(sale::Column::CreatedAt.between(bounds.start, bounds.end))
            .order_by_desc(sale::Column::CreatedAt)
            .all(self.db_pool.as_ref())
            .await?;

        let mut responses = Vec::with_capacity(day_sales.len());
        for sale_model in day_sales {
            let items = self.items_for(sale_model.id).await?;
            responses.push(to_response(sale_model, items));
        }
        Ok(responses)
    }

    async fn items_for(&self, sale_id: Uuid) -> Result<Vec<sale_item::Model>, ServiceError> {
        Ok(sale_item::Entity::find()
            .filter(sale_item::Column::SaleId.eq(sale_id))
            .all(self.db_pool.as_ref())
            .await?)
    }
}

/// Returns the bulk price applying to `quantity` sacks of the tier, if the
/// tier carries one and the quantity reaches its threshold. Callers use this
/// to decide the frozen `unit_price` and the `is_special_price` flag before
/// building the request.
pub async fn applicable_special_price<C: ConnectionTrait>(
    conn: &C,
    sack_price_id: Uuid,
    quantity: i32,
) -> Result<Option<special_price::Model>, ServiceError> {
    let found = special_price::Entity::find()
        .filter(special_price::Column::SackPriceId.eq(sack_price_id))
        .one(conn)
        .await?;
    Ok(found.filter(|sp| quantity >= sp.minimum_quantity))
}

/// Increments every tier referenced by the sale's current items back by the
/// recorded quantity — the exact inverse of the decrements applied when the
/// items were written.
async fn restore_item_stock<C: ConnectionTrait>(
    conn: &C,
    sale_id: Uuid,
) -> Result<(), ServiceError> {
    let items = sale_item::Entity::find()
        .filter(sale_item::Column::SaleId.eq(sale_id))
        .all(conn)
        .await?;

    for item in items {
        let tier = TierRef::from_ids(item.sack_price_id, item.per_unit_price_id)?;
        stock::increment(conn, &tier, &item.quantity).await?;
    }
    Ok(())
}

async fn insert_items<C: ConnectionTrait>(
    conn: &C,
    sale_id: Uuid,
    items: &[SaleItemInput],
    now: DateTime<Utc>,
) -> Result<Vec<sale_item::Model>, ServiceError> {
    let mut models = Vec::with_capacity(items.len());
    for input in items {
        let model = sale_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            sale_id: Set(sale_id),
            product_id: Set(input.product_id),
            sack_price_id: Set(input.sack_price_id),
            per_unit_price_id: Set(input.per_unit_price_id),
            quantity: Set(input.quantity),
            unit_price: Set(input.unit_price),
            discounted_price: Set(input.discounted_price),
            is_special_price: Set(input.is_special_price),
            is_discounted: Set(input.is_discounted),
            created_at: Set(now),
        }
        .insert(conn)
        .await?;
        models.push(model);
    }
    Ok(models)
}

fn to_response(sale_model: sale::Model, items: Vec<sale_item::Model>) -> SaleResponse {
    SaleResponse {
        id: sale_model.id,
        cashier_id: sale_model.cashier_id,
        payment_method: sale_model.payment_method,
        total_amount: sale_model.total_amount,
        order_id: sale_model.order_id,
        voided: sale_model.voided,
        created_at: sale_model.created_at,
        updated_at: sale_model.updated_at,
        items: items
            .into_iter()
            .map(|item| SaleItemResponse {
                id: item.id,
                product_id: item.product_id,
                sack_price_id: item.sack_price_id,
                per_unit_price_id: item.per_unit_price_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
                discounted_price: item.discounted_price,
                is_special_price: item.is_special_price,
                is_discounted: item.is_discounted,
            })
            .collect(),
    }
}
