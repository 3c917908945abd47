//! Order workflow collaborator.
//!
//! Orders are owned by an upstream workflow; the ledger only flips their
//! status when a sale fulfils or un-fulfils one. Both helpers take a
//! [`ConnectionTrait`] so the flip happens inside the sale's own bounded
//! transaction.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};
use tracing::info;
use uuid::Uuid;

use crate::entities::order::{self, OrderStatus};
use crate::errors::ServiceError;

/// Marks the order completed and links the fulfilling sale.
pub async fn complete_order<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
    sale_id: Uuid,
) -> Result<order::Model, ServiceError> {
    let existing = order::Entity::find_by_id(order_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Order", order_id))?;

    let mut active: order::ActiveModel = existing.into();
    active.status = Set(OrderStatus::Completed.as_str().to_string());
    active.sale_id = Set(Some(sale_id));
    active.updated_at = Set(Some(Utc::now()));

    let updated = active.update(conn).await?;
    info!(order_id = %order_id, sale_id = %sale_id, "Order completed by sale");
    Ok(updated)
}

/// Reverts the order to pending and clears the sale link. Used when the
/// fulfilling sale is deleted or re-pointed at a different order.
pub async fn revert_order<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
) -> Result<order::Model, ServiceError> {
    let existing = order::Entity::find_by_id(order_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Order", order_id))?;

    let mut active: order::ActiveModel = existing.into();
    active.status = Set(OrderStatus::Pending.as_str().to_string());
    active.sale_id = Set(None);
    active.updated_at = Set(Some(Utc::now()));

    let updated = active.update(conn).await?;
    info!(order_id = %order_id, "Order reverted to pending");
    Ok(updated)
}
