//! Stock Counter Store.
//!
//! Tier counters are never mutated standalone by the ledger: every helper
//! here is generic over [`ConnectionTrait`] so callers compose it with
//! arbitrarily many sibling statements inside one bounded transaction.
//! Serialization of concurrent updates to the same counter is delegated to
//! the store's isolation level; there is no application-level locking and no
//! floor check — stock is allowed to go negative.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};
use tracing::debug;
use uuid::Uuid;

use crate::entities::{per_unit_price, sack_price};
use crate::errors::ServiceError;

/// Reference to exactly one price tier of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierRef {
    Sack(Uuid),
    PerUnit(Uuid),
}

impl TierRef {
    /// Builds a tier reference from the optional id pair carried by line
    /// items. Exactly one side must be present.
    pub fn from_ids(
        sack_price_id: Option<Uuid>,
        per_unit_price_id: Option<Uuid>,
    ) -> Result<Self, ServiceError> {
        match (sack_price_id, per_unit_price_id) {
            (Some(id), None) => Ok(TierRef::Sack(id)),
            (None, Some(id)) => Ok(TierRef::PerUnit(id)),
            _ => Err(ServiceError::ValidationError(
                "exactly one of sack_price_id / per_unit_price_id must be set".to_string(),
            )),
        }
    }

    pub fn is_per_unit(&self) -> bool {
        matches!(self, TierRef::PerUnit(_))
    }
}

/// Converts a line-item quantity into a sack count. Sack tiers count whole
/// sacks; a fractional quantity against one is a caller error.
pub fn sack_count(quantity: &Decimal) -> Result<i32, ServiceError> {
    if !quantity.fract().is_zero() {
        return Err(ServiceError::ValidationError(format!(
            "sack tier quantity must be a whole number, got {}",
            quantity
        )));
    }
    quantity.to_i32().ok_or_else(|| {
        ServiceError::ValidationError(format!("sack tier quantity {} out of range", quantity))
    })
}

pub async fn increment_sack_stock<C: ConnectionTrait>(
    conn: &C,
    sack_price_id: Uuid,
    quantity: i32,
) -> Result<sack_price::Model, ServiceError> {
    adjust_sack_stock(conn, sack_price_id, quantity).await
}

pub async fn decrement_sack_stock<C: ConnectionTrait>(
    conn: &C,
    sack_price_id: Uuid,
    quantity: i32,
) -> Result<sack_price::Model, ServiceError> {
    adjust_sack_stock(conn, sack_price_id, -quantity).await
}

pub async fn increment_per_unit_stock<C: ConnectionTrait>(
    conn: &C,
    per_unit_price_id: Uuid,
    quantity: Decimal,
) -> Result<per_unit_price::Model, ServiceError> {
    adjust_per_unit_stock(conn, per_unit_price_id, quantity).await
}

pub async fn decrement_per_unit_stock<C: ConnectionTrait>(
    conn: &C,
    per_unit_price_id: Uuid,
    quantity: Decimal,
) -> Result<per_unit_price::Model, ServiceError> {
    adjust_per_unit_stock(conn, per_unit_price_id, -quantity).await
}

/// Dispatching increment: integer counts for sack tiers, decimal weights for
/// per-unit tiers, so no precision is lost on either side.
pub async fn increment<C: ConnectionTrait>(
    conn: &C,
    tier: &TierRef,
    quantity: &Decimal,
) -> Result<(), ServiceError> {
    match tier {
        TierRef::Sack(id) => {
            increment_sack_stock(conn, *id, sack_count(quantity)?).await?;
        }
        TierRef::PerUnit(id) => {
            increment_per_unit_stock(conn, *id, *quantity).await?;
        }
    }
    Ok(())
}

/// Dispatching decrement, see [`increment`].
pub async fn decrement<C: ConnectionTrait>(
    conn: &C,
    tier: &TierRef,
    quantity: &Decimal,
) -> Result<(), ServiceError> {
    match tier {
        TierRef::Sack(id) => {
            decrement_sack_stock(conn, *id, sack_count(quantity)?).await?;
        }
        TierRef::PerUnit(id) => {
            decrement_per_unit_stock(conn, *id, *quantity).await?;
        }
    }
    Ok(())
}

async fn adjust_sack_stock<C: ConnectionTrait>(
    conn: &C,
    sack_price_id: Uuid,
    delta: i32,
) -> Result<sack_price::Model, ServiceError> {
    let tier = sack_price::Entity::find_by_id(sack_price_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Sack price tier", sack_price_id))?;

    let new_stock = tier.stock + delta;
    debug!(tier_id = %sack_price_id, delta, new_stock, "Adjusting sack stock");

    let mut active: sack_price::ActiveModel = tier.into();
    active.stock = Set(new_stock);
    active.updated_at = Set(Some(chrono::Utc::now()));

    Ok(active.update(conn).await?)
}

async fn adjust_per_unit_stock<C: ConnectionTrait>(
    conn: &C,
    per_unit_price_id: Uuid,
    delta: Decimal,
) -> Result<per_unit_price::Model, ServiceError> {
    let tier = per_unit_price::Entity::find_by_id(per_unit_price_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Per-unit price tier", per_unit_price_id))?;

    let new_stock = tier.stock + delta;
    debug!(tier_id = %per_unit_price_id, %delta, %new_stock, "Adjusting per-unit stock");

    let mut active: per_unit_price::ActiveModel = tier.into();
    active.stock = Set(new_stock);
    active.updated_at = Set(Some(chrono::Utc::now()));

    Ok(active.update(conn).await?)
}
