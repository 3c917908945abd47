use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which ledger a sheet backs. One generic grid engine serves both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SheetKind {
    Kahon,
    Inventory,
}

impl SheetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetKind::Kahon => "kahon",
            SheetKind::Inventory => "inventory",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "kahon" => Some(SheetKind::Kahon),
            "inventory" => Some(SheetKind::Inventory),
            _ => None,
        }
    }

    pub fn default_name(&self) -> &'static str {
        match self {
            SheetKind::Kahon => "Kahon",
            SheetKind::Inventory => "Inventory",
        }
    }
}

/// A spreadsheet-like grid owned by one cashier. At most one sheet per
/// (owner, kind); created lazily on first access.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sheets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    /// Backing ledger, stored as string (see [`SheetKind`])
    pub kind: String,
    pub name: String,
    pub columns: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::grid_row::Entity")]
    GridRow,
}

impl Related<super::grid_row::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GridRow.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
