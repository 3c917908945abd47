use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog product. `cashier_id` is None until a cashier first moves stock
/// for it, at which point the product is auto-assigned.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub cashier_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sack_price::Entity")]
    SackPrice,
    #[sea_orm(has_one = "super::per_unit_price::Entity")]
    PerUnitPrice,
}

impl Related<super::sack_price::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SackPrice.def()
    }
}

impl Related<super::per_unit_price::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PerUnitPrice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
