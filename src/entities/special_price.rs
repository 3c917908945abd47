use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bulk pricing attached to a sack tier: `price` applies from
/// `minimum_quantity` sacks upward.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "special_prices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sack_price_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub price: Decimal,
    pub minimum_quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sack_price::Entity",
        from = "Column::SackPriceId",
        to = "super::sack_price::Column::Id"
    )]
    SackPrice,
}

impl Related<super::sack_price::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SackPrice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
