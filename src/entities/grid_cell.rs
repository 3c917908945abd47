use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One cell, keyed by (row, column). The formula is opaque payload — stored
/// verbatim, never evaluated; `is_calculated` is derived from its presence.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grid_cells")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub row_id: Uuid,
    /// In [0, sheet.columns), unique within the row
    pub column_index: i32,
    pub value: String,
    pub formula: Option<String>,
    pub is_calculated: bool,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::grid_row::Entity",
        from = "Column::RowId",
        to = "super::grid_row::Column::Id"
    )]
    GridRow,
}

impl Related<super::grid_row::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GridRow.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
