use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where transferred stock went. `Kahon` additionally materializes a grid
/// row on the cashier's Kahon sheet; the other kinds are standalone ledger
/// records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferKind {
    Kahon,
    OwnConsumption,
    ReturnToSupplier,
    /// Zero-quantity audit record emitted by per-unit deliveries
    Delivery,
}

impl TransferKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferKind::Kahon => "kahon",
            TransferKind::OwnConsumption => "own_consumption",
            TransferKind::ReturnToSupplier => "return_to_supplier",
            TransferKind::Delivery => "delivery",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "kahon" => Some(TransferKind::Kahon),
            "own_consumption" => Some(TransferKind::OwnConsumption),
            "return_to_supplier" => Some(TransferKind::ReturnToSupplier),
            "delivery" => Some(TransferKind::Delivery),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transfers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cashier_id: Uuid,
    pub product_id: Uuid,
    pub sack_price_id: Option<Uuid>,
    pub per_unit_price_id: Option<Uuid>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub quantity: Decimal,
    pub name: String,
    /// Transfer kind, stored as string (see [`TransferKind`])
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
