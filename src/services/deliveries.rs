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
use crate::entities::transfer::{self, TransferKind};
use crate::entities::{delivery, delivery_item, product};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::stock::{self, TierRef};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryItemInput {
    pub product_id: Uuid,
    pub sack_price_id: Option<Uuid>,
    pub per_unit_price_id: Option<Uuid>,
    pub quantity: Decimal,
}

impl DeliveryItemInput {
    fn tier(&self) -> Result<TierRef, ServiceError> {
        TierRef::from_ids(self.sack_price_id, self.per_unit_price_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDeliveryRequest {
    #[validate(length(min = 1, message = "Driver name cannot be empty"))]
    pub driver_name: String,
    pub delivery_time_start: DateTime<Utc>,
    #[validate(length(min = 1, message = "A delivery needs at least one line item"))]
    pub items: Vec<DeliveryItemInput>,
}

/// A delivery edit is a full replace, like a sale edit.
pub type UpdateDeliveryRequest = CreateDeliveryRequest;

#[derive(Debug, Serialize, Deserialize)]
pub struct DeliveryResponse {
    pub id: Uuid,
    pub cashier_id: Uuid,
    pub driver_name: String,
    pub delivery_time_start: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub items: Vec<delivery_item::Model>,
}

/// Movement Ledger, delivery path.
///
/// Ownership of every referenced product is settled before any counter moves:
/// an unassigned product is claimed for the delivering cashier, a product
/// owned by someone else fails the whole call with `Forbidden`.
#[derive(Clone, Debug)]
pub struct DeliveryService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    txn_timeout: Duration,
}

impl DeliveryService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, txn_timeout: Duration) -> Self {
        Self {
            db_pool,
            event_sender,
            txn_timeout,
        }
    }

    /// Records a delivery: claims/verifies product ownership, increments each
    /// line's tier counter and persists the delivery rows atomically. Per-unit
    /// lines additionally leave a zero-quantity audit transfer carrying the
    /// delivered weight in its name.
    #[instrument(skip(self, request), fields(cashier_id = %cashier_id))]
    pub async fn create_delivery(
        &self,
        cashier_id: Uuid,
        request: CreateDeliveryRequest,
    ) -> Result<DeliveryResponse, ServiceError> {
        request.validate()?;

        let delivery_id = Uuid::new_v4();
        let (delivery_model, item_models) =
            transaction_with_timeout(self.db_pool.as_ref(), self.txn_timeout, move |txn| {
                Box::pin(async move {
                    let product_names =
                        resolve_ownership(txn, cashier_id, &request.items).await?;

                    let now = Utc::now();
                    let delivery_model = delivery::ActiveModel {
                        id: Set(delivery_id),
                        cashier_id: Set(cashier_id),
                        driver_name: Set(request.driver_name.clone()),
                        delivery_time_start: Set(request.delivery_time_start),
                        created_at: Set(now),
                        updated_at: Set(None),
                    }
                    .insert(txn)
                    .await?;

                    let item_models = apply_items(
                        txn,
                        delivery_id,
                        cashier_id,
                        &request.items,
                        &product_names,
                        now,
                    )
                    .await?;

                    Ok((delivery_model, item_models))
                })
            })
            .await?;

        info!(delivery_id = %delivery_id, items = item_models.len(), "Delivery recorded");

        if let Err(e) = self
            .event_sender
            .send(Event::DeliveryCreated(delivery_id))
            .await
        {
            tracing::warn!(error = %e, delivery_id = %delivery_id, "Failed to send delivery created event");
        }

        Ok(to_response(delivery_model, item_models))
    }

    /// Replaces a delivery: reverses the stock effect of every existing item,
    /// deletes them, updates the header, then applies the new items. One
    /// transaction end to end.
    #[instrument(skip(self, request), fields(delivery_id = %delivery_id))]
    pub async fn update_delivery(
        &self,
        delivery_id: Uuid,
        request: UpdateDeliveryRequest,
    ) -> Result<DeliveryResponse, ServiceError> {
        request.validate()?;

        let (delivery_model, item_models) =
            transaction_with_timeout(self.db_pool.as_ref(), self.txn_timeout, move |txn| {
                Box::pin(async move {
                    let existing = delivery::Entity::find_by_id(delivery_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| ServiceError::not_found("Delivery", delivery_id))?;
                    let cashier_id = existing.cashier_id;

                    let old_items = delivery_item::Entity::find()
                        .filter(delivery_item::Column::DeliveryId.eq(delivery_id))
                        .all(txn)
                        .await?;
                    for item in &old_items {
                        let tier = TierRef::from_ids(item.sack_price_id, item.per_unit_price_id)?;
                        stock::decrement(txn, &tier, &item.quantity).await?;
                    }
                    delivery_item::Entity::delete_many()
                        .filter(delivery_item::Column::DeliveryId.eq(delivery_id))
                        .exec(txn)
                        .await?;

                    let product_names =
                        resolve_ownership(txn, cashier_id, &request.items).await?;

                    let now = Utc::now();
                    let mut active: delivery::ActiveModel = existing.into();
                    active.driver_name = Set(request.driver_name.clone());
                    active.delivery_time_start = Set(request.delivery_time_start);
                    active.updated_at = Set(Some(now));
                    let delivery_model = active.update(txn).await?;

                    let item_models = apply_items(
                        txn,
                        delivery_id,
                        cashier_id,
                        &request.items,
                        &product_names,
                        now,
                    )
                    .await?;

                    Ok((delivery_model, item_models))
                })
            })
            .await?;

        info!(delivery_id = %delivery_id, "Delivery updated");

        if let Err(e) = self
            .event_sender
            .send(Event::DeliveryUpdated(delivery_id))
            .await
        {
            tracing::warn!(error = %e, delivery_id = %delivery_id, "Failed to send delivery updated event");
        }

        Ok(to_response(delivery_model, item_models))
    }

    /// Fetches one delivery with its items.
    #[instrument(skip(self), fields(delivery_id = %delivery_id))]
    pub async fn get_delivery(&self, delivery_id: Uuid) -> Result<DeliveryResponse, ServiceError> {
        let delivery_model = delivery::Entity::find_by_id(delivery_id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("Delivery", delivery_id))?;

        let items = delivery_item::Entity::find()
            .filter(delivery_item::Column::DeliveryId.eq(delivery_id))
            .all(self.db_pool.as_ref())
            .await?;

        Ok(to_response(delivery_model, items))
    }

    /// Lists a cashier's deliveries for one business day, newest first.
    #[instrument(skip(self), fields(cashier_id = %cashier_id))]
    pub async fn deliveries_for_day(
        &self,
        cashier_id: Uuid,
        date: Option<&str>,
    ) -> Result<Vec<DeliveryResponse>, ServiceError> {
        let bounds = calendar::business_day_bounds(date)?;

        let deliveries = delivery::Entity::find()
            .filter(delivery::Column::CashierId.eq(cashier_id))
            .filter(delivery::Column::CreatedAt.between(bounds.start, bounds.end))
            .order_by_desc(delivery::Column::CreatedAt)
            .all(self.db_pool.as_ref())
            .await?;

        let mut responses = Vec::with_capacity(deliveries.len());
        for delivery_model in deliveries {
            let items = delivery_item::Entity::find()
                .filter(delivery_item::Column::DeliveryId.eq(delivery_model.id))
                .all(self.db_pool.as_ref())
                .await?;
            responses.push(to_response(delivery_model, items));
        }
        Ok(responses)
    }
}

/// First pass over the items: every product must exist and either belong to
/// the delivering cashier or be unclaimed. Unclaimed products are assigned to
/// the cashier on the spot. Returns product names keyed positionally for the
/// audit transfers of the second pass.
async fn resolve_ownership<C: ConnectionTrait>(
    conn: &C,
    cashier_id: Uuid,
    items: &[DeliveryItemInput],
) -> Result<Vec<String>, ServiceError> {
    let mut names = Vec::with_capacity(items.len());
    for item in items {
        let found = product::Entity::find_by_id(item.product_id)
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", item.product_id))?;

        match found.cashier_id {
            Some(owner) if owner != cashier_id => {
                return Err(ServiceError::Forbidden(format!(
                    "product {} belongs to another cashier",
                    item.product_id
                )));
            }
            Some(_) => names.push(found.name),
            None => {
                let name = found.name.clone();
                let mut active: product::ActiveModel = found.into();
                active.cashier_id = Set(Some(cashier_id));
                active.updated_at = Set(Some(Utc::now()));
                active.update(conn).await?;
                info!(product_id = %item.product_id, cashier_id = %cashier_id, "Product auto-assigned to cashier");
                names.push(name);
            }
        }
    }
    Ok(names)
}

/// Second pass: increment stock and persist the delivery items. Per-unit
/// lines emit the zero-quantity audit transfer.
async fn apply_items<C: ConnectionTrait>(
    conn: &C,
    delivery_id: Uuid,
    cashier_id: Uuid,
    items: &[DeliveryItemInput],
    product_names: &[String],
    now: DateTime<Utc>,
) -> Result<Vec<delivery_item::Model>, ServiceError> {
    let mut models = Vec::with_capacity(items.len());
    for (input, product_name) in items.iter().zip(product_names) {
        let tier = input.tier()?;
        stock::increment(conn, &tier, &input.quantity).await?;

        let model = delivery_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            delivery_id: Set(delivery_id),
            product_id: Set(input.product_id),
            sack_price_id: Set(input.sack_price_id),
            per_unit_price_id: Set(input.per_unit_price_id),
            quantity: Set(input.quantity),
            created_at: Set(now),
        }
        .insert(conn)
        .await?;
        models.push(model);

        if tier.is_per_unit() {
            transfer::ActiveModel {
                id: Set(Uuid::new_v4()),
                cashier_id: Set(cashier_id),
                product_id: Set(input.product_id),
                sack_price_id: Set(input.sack_price_id),
                per_unit_price_id: Set(input.per_unit_price_id),
                quantity: Set(Decimal::ZERO),
                name: Set(format!("{} ({} kg)", product_name, input.quantity)),
                kind: Set(TransferKind::Delivery.as_str().to_string()),
                created_at: Set(now),
            }
            .insert(conn)
            .await?;
        }
    }
    Ok(models)
}

fn to_response(delivery_model: delivery::Model, items: Vec<delivery_item::Model>) -> DeliveryResponse {
    DeliveryResponse {
        id: delivery_model.id,
        cashier_id: delivery_model.cashier_id,
        driver_name: delivery_model.driver_name,
        delivery_time_start: delivery_model.delivery_time_start,
        created_at: delivery_model.created_at,
        updated_at: delivery_model.updated_at,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn create_request_rejects_empty_driver_name() {
        let request = CreateDeliveryRequest {
            driver_name: String::new(),
            delivery_time_start: Utc::now(),
            items: vec![DeliveryItemInput {
                product_id: Uuid::new_v4(),
                sack_price_id: Some(Uuid::new_v4()),
                per_unit_price_id: None,
                quantity: dec!(5),
            }],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn create_request_rejects_empty_items() {
        let request = CreateDeliveryRequest {
            driver_name: "Ramon".to_string(),
            delivery_time_start: Utc::now(),
            items: vec![],
        };
        assert!(request.validate().is_err());
    }
}
