use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sack sizes a product can be sold in. A product carries at most one sack
/// tier per size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SackKind {
    FiftyKg,
    TwentyFiveKg,
    FiveKg,
}

impl SackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SackKind::FiftyKg => "fifty_kg",
            SackKind::TwentyFiveKg => "twenty_five_kg",
            SackKind::FiveKg => "five_kg",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "fifty_kg" => Some(SackKind::FiftyKg),
            "twenty_five_kg" => Some(SackKind::TwentyFiveKg),
            "five_kg" => Some(SackKind::FiveKg),
            _ => None,
        }
    }
}

/// Price tier for whole-sack sales. Stock is an integer sack count.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sack_prices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub price: Decimal,
    pub stock: i32,
    /// Sack size, stored as string (see [`SackKind`])
    pub kind: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub profit_margin: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(has_one = "super::special_price::Entity")]
    SpecialPrice,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::special_price::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SpecialPrice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
