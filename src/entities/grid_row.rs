use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One ordered row of a sheet. `row_index` is zero-based and unique within
/// the sheet at all times, including after bulk repositioning. Item rows
/// carry a back-reference to the originating ledger item.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grid_rows")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sheet_id: Uuid,
    pub row_index: i32,
    pub is_item_row: bool,
    /// KahonItem (or inventory item) that produced this row, if any
    pub item_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sheet::Entity",
        from = "Column::SheetId",
        to = "super::sheet::Column::Id"
    )]
    Sheet,
    #[sea_orm(has_many = "super::grid_cell::Entity")]
    GridCell,
}

impl Related<super::sheet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sheet.def()
    }
}

impl Related<super::grid_cell::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GridCell.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
