//! Grid Store.
//!
//! One generic sheet/row/cell engine backs every tabular ledger; sheets are
//! keyed by (owner, kind) and created lazily. Formulas are opaque payload:
//! stored verbatim, never evaluated here.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::db::{transaction_with_timeout, DbPool};
use crate::entities::sheet::{self, SheetKind};
use crate::entities::{grid_cell, grid_row};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// One cell write in a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellUpdateInput {
    pub cell_id: Uuid,
    pub value: String,
    pub formula: Option<String>,
    pub color: Option<String>,
}

/// One row reassignment in a bulk reposition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RowMappingInput {
    pub row_id: Uuid,
    pub row_index: i32,
}

/// Structured outcome of a reposition pre-check. Not an error: callers
/// inspect it and surface the offending ids/indices to the user.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RowMappingValidation {
    /// Target indices requested more than once within the batch, or already
    /// held by a sheet row the batch leaves in place
    pub duplicate_indices: Vec<i32>,
    /// Row ids that do not belong to the sheet being reordered
    pub foreign_row_ids: Vec<Uuid>,
}

impl RowMappingValidation {
    pub fn is_valid(&self) -> bool {
        self.duplicate_indices.is_empty() && self.foreign_row_ids.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct GridService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    txn_timeout: Duration,
    default_columns: i32,
}

impl GridService {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        txn_timeout: Duration,
        default_columns: i32,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            txn_timeout,
            default_columns,
        }
    }

    /// Returns the owner's sheet of the given kind, creating it on first
    /// access with the configured column count.
    #[instrument(skip(self), fields(owner_id = %owner_id, kind = kind.as_str()))]
    pub async fn get_or_create_sheet(
        &self,
        owner_id: Uuid,
        kind: SheetKind,
    ) -> Result<sheet::Model, ServiceError> {
        let existing = find_sheet(self.db_pool.as_ref(), owner_id, kind).await?;
        if let Some(found) = existing {
            return Ok(found);
        }

        let created =
            create_sheet_on(self.db_pool.as_ref(), owner_id, kind, self.default_columns).await?;

        if let Err(e) = self
            .event_sender
            .send(Event::SheetCreated {
                sheet_id: created.id,
                owner_id,
            })
            .await
        {
            tracing::warn!(error = %e, "Failed to send sheet created event");
        }

        Ok(created)
    }

    /// Creates a sheet explicitly with a caller-chosen name and width.
    /// Fails if the owner already has a sheet of this kind.
    #[instrument(skip(self, name), fields(owner_id = %owner_id, kind = kind.as_str()))]
    pub async fn create_sheet(
        &self,
        owner_id: Uuid,
        kind: SheetKind,
        name: String,
        columns: i32,
    ) -> Result<sheet::Model, ServiceError> {
        if columns < 2 {
            return Err(ServiceError::ValidationError(
                "a sheet needs at least the quantity and name columns".to_string(),
            ));
        }
        if find_sheet(self.db_pool.as_ref(), owner_id, kind).await?.is_some() {
            return Err(ServiceError::InvalidOperation(format!(
                "owner {} already has a {} sheet",
                owner_id,
                kind.as_str()
            )));
        }

        let created = sheet::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            kind: Set(kind.as_str().to_string()),
            name: Set(name),
            columns: Set(columns),
            created_at: Set(Utc::now()),
        }
        .insert(self.db_pool.as_ref())
        .await?;

        if let Err(e) = self
            .event_sender
            .send(Event::SheetCreated {
                sheet_id: created.id,
                owner_id,
            })
            .await
        {
            tracing::warn!(error = %e, "Failed to send sheet created event");
        }

        Ok(created)
    }

    /// Adds an item row: column 0 carries the stringified quantity, column 1
    /// the item name, every remaining column an empty string.
    #[instrument(skip(self, name), fields(sheet_id = %sheet_id))]
    pub async fn add_item_row(
        &self,
        sheet_id: Uuid,
        item_id: Uuid,
        row_index: i32,
        quantity: i32,
        name: String,
    ) -> Result<grid_row::Model, ServiceError> {
        transaction_with_timeout(self.db_pool.as_ref(), self.txn_timeout, move |txn| {
            Box::pin(async move {
                let sheet_model = require_sheet(txn, sheet_id).await?;
                insert_item_row_on(txn, &sheet_model, item_id, row_index, quantity, &name).await
            })
        })
        .await
    }

    /// Adds a non-item row with column 1 set to the description. Used for
    /// ad-hoc calculation lines between item rows.
    #[instrument(skip(self, description), fields(sheet_id = %sheet_id))]
    pub async fn add_calculation_row(
        &self,
        sheet_id: Uuid,
        row_index: i32,
        description: String,
    ) -> Result<grid_row::Model, ServiceError> {
        transaction_with_timeout(self.db_pool.as_ref(), self.txn_timeout, move |txn| {
            Box::pin(async move {
                let sheet_model = require_sheet(txn, sheet_id).await?;
                let cells = seed_cells(sheet_model.columns, None, Some(&description));
                insert_row_with_cells(txn, sheet_id, row_index, false, None, cells).await
            })
        })
        .await
    }

    /// Deletes a row and its cells, cells first.
    #[instrument(skip(self), fields(row_id = %row_id))]
    pub async fn delete_row(&self, row_id: Uuid) -> Result<(), ServiceError> {
        transaction_with_timeout(self.db_pool.as_ref(), self.txn_timeout, move |txn| {
            Box::pin(async move {
                grid_row::Entity::find_by_id(row_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("Grid row", row_id))?;

                grid_cell::Entity::delete_many()
                    .filter(grid_cell::Column::RowId.eq(row_id))
                    .exec(txn)
                    .await?;
                grid_row::Entity::delete_by_id(row_id).exec(txn).await?;
                Ok(())
            })
        })
        .await
    }

    /// Writes a cell at (row, column). Row creation pre-seeds one cell per
    /// column, so a cell already sitting at that position is overwritten in
    /// place; a column deleted earlier gets a fresh cell. `is_calculated` is
    /// derived from formula presence and the column index must fit the
    /// sheet's width.
    #[instrument(skip(self, value, formula, color), fields(row_id = %row_id, column_index))]
    pub async fn add_cell(
        &self,
        row_id: Uuid,
        column_index: i32,
        value: String,
        formula: Option<String>,
        color: Option<String>,
    ) -> Result<grid_cell::Model, ServiceError> {
        let db = self.db_pool.as_ref();

        let row = grid_row::Entity::find_by_id(row_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Grid row", row_id))?;
        let sheet_model = require_sheet(db, row.sheet_id).await?;
        if column_index < 0 || column_index >= sheet_model.columns {
            return Err(ServiceError::ValidationError(format!(
                "column index {} out of range for a {}-column sheet",
                column_index, sheet_model.columns
            )));
        }

        let is_calculated = formula.is_some();
        let existing = grid_cell::Entity::find()
            .filter(grid_cell::Column::RowId.eq(row_id))
            .filter(grid_cell::Column::ColumnIndex.eq(column_index))
            .one(db)
            .await?;

        if let Some(seeded) = existing {
            let mut active: grid_cell::ActiveModel = seeded.into();
            active.value = Set(value);
            active.formula = Set(formula);
            active.is_calculated = Set(is_calculated);
            active.color = Set(color);
            active.updated_at = Set(Some(Utc::now()));
            return Ok(active.update(db).await?);
        }

        Ok(grid_cell::ActiveModel {
            id: Set(Uuid::new_v4()),
            row_id: Set(row_id),
            column_index: Set(column_index),
            value: Set(value),
            formula: Set(formula),
            is_calculated: Set(is_calculated),
            color: Set(color),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(db)
        .await?)
    }

    /// Overwrites a cell's value, formula and color. `is_calculated` tracks
    /// the new formula, so clearing the formula clears the flag too.
    #[instrument(skip(self, value, formula, color), fields(cell_id = %cell_id))]
    pub async fn update_cell(
        &self,
        cell_id: Uuid,
        value: String,
        formula: Option<String>,
        color: Option<String>,
    ) -> Result<grid_cell::Model, ServiceError> {
        let db = self.db_pool.as_ref();
        let existing = grid_cell::Entity::find_by_id(cell_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Grid cell", cell_id))?;

        let is_calculated = formula.is_some();
        let mut active: grid_cell::ActiveModel = existing.into();
        active.value = Set(value);
        active.formula = Set(formula);
        active.is_calculated = Set(is_calculated);
        active.color = Set(color);
        active.updated_at = Set(Some(Utc::now()));
        Ok(active.update(db).await?)
    }

    #[instrument(skip(self), fields(cell_id = %cell_id))]
    pub async fn delete_cell(&self, cell_id: Uuid) -> Result<(), ServiceError> {
        let result = grid_cell::Entity::delete_by_id(cell_id)
            .exec(self.db_pool.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Grid cell", cell_id));
        }
        Ok(())
    }

    /// Applies a batch of cell writes in one transaction: either every write
    /// lands or none do. A missing cell id fails the whole batch.
    #[instrument(skip(self, updates), fields(count = updates.len()))]
    pub async fn update_cells(
        &self,
        updates: Vec<CellUpdateInput>,
    ) -> Result<Vec<grid_cell::Model>, ServiceError> {
        transaction_with_timeout(self.db_pool.as_ref(), self.txn_timeout, move |txn| {
            Box::pin(async move {
                let mut models = Vec::with_capacity(updates.len());
                for update in updates {
                    let existing = grid_cell::Entity::find_by_id(update.cell_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| ServiceError::not_found("Grid cell", update.cell_id))?;

                    let is_calculated = update.formula.is_some();
                    let mut active: grid_cell::ActiveModel = existing.into();
                    active.value = Set(update.value);
                    active.formula = Set(update.formula);
                    active.is_calculated = Set(is_calculated);
                    active.color = Set(update.color);
                    active.updated_at = Set(Some(Utc::now()));
                    models.push(active.update(txn).await?);
                }
                Ok(models)
            })
        })
        .await
    }

    /// Pre-checks a bulk reposition without touching anything: flags target
    /// indices requested twice, targets that would land on a row the batch
    /// does not move, and row ids belonging to a different sheet. Row indices
    /// stay unique within the sheet only when all three checks pass.
    #[instrument(skip(self, mappings), fields(sheet_id = %sheet_id, count = mappings.len()))]
    pub async fn validate_row_mappings(
        &self,
        mappings: &[RowMappingInput],
        sheet_id: Uuid,
    ) -> Result<RowMappingValidation, ServiceError> {
        validate_mappings_on(self.db_pool.as_ref(), mappings, sheet_id).await
    }

    /// Reassigns row indices in bulk. Validation runs first, inside the same
    /// transaction as the writes; a failed validation mutates nothing and is
    /// reported as `ValidationError`.
    #[instrument(skip(self, mappings), fields(sheet_id = %sheet_id, count = mappings.len()))]
    pub async fn batch_update_row_positions(
        &self,
        mappings: Vec<RowMappingInput>,
        sheet_id: Uuid,
    ) -> Result<(), ServiceError> {
        transaction_with_timeout(self.db_pool.as_ref(), self.txn_timeout, move |txn| {
            Box::pin(async move {
                let validation = validate_mappings_on(txn, &mappings, sheet_id).await?;
                if !validation.is_valid() {
                    return Err(ServiceError::ValidationError(format!(
                        "row mapping rejected: {} duplicate target indices, {} rows from another sheet",
                        validation.duplicate_indices.len(),
                        validation.foreign_row_ids.len()
                    )));
                }

                for mapping in &mappings {
                    let existing = grid_row::Entity::find_by_id(mapping.row_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| ServiceError::not_found("Grid row", mapping.row_id))?;
                    let mut active: grid_row::ActiveModel = existing.into();
                    active.row_index = Set(mapping.row_index);
                    active.update(txn).await?;
                }

                info!(sheet_id = %sheet_id, rows = mappings.len(), "Rows repositioned");
                Ok(())
            })
        })
        .await
    }

    /// Rows of a sheet in display order, each with its cells sorted by
    /// column.
    pub async fn rows_with_cells(
        &self,
        sheet_id: Uuid,
    ) -> Result<Vec<(grid_row::Model, Vec<grid_cell::Model>)>, ServiceError> {
        let db = self.db_pool.as_ref();
        let rows = grid_row::Entity::find()
            .filter(grid_row::Column::SheetId.eq(sheet_id))
            .order_by_asc(grid_row::Column::RowIndex)
            .all(db)
            .await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let cells = grid_cell::Entity::find()
                .filter(grid_cell::Column::RowId.eq(row.id))
                .order_by_asc(grid_cell::Column::ColumnIndex)
                .all(db)
                .await?;
            result.push((row, cells));
        }
        Ok(result)
    }
}

pub(crate) async fn find_sheet<C: ConnectionTrait>(
    conn: &C,
    owner_id: Uuid,
    kind: SheetKind,
) -> Result<Option<sheet::Model>, ServiceError> {
    Ok(sheet::Entity::find()
        .filter(sheet::Column::OwnerId.eq(owner_id))
        .filter(sheet::Column::Kind.eq(kind.as_str()))
        .one(conn)
        .await?)
}

pub(crate) async fn create_sheet_on<C: ConnectionTrait>(
    conn: &C,
    owner_id: Uuid,
    kind: SheetKind,
    columns: i32,
) -> Result<sheet::Model, ServiceError> {
    let created = sheet::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id),
        kind: Set(kind.as_str().to_string()),
        name: Set(kind.default_name().to_string()),
        columns: Set(columns),
        created_at: Set(Utc::now()),
    }
    .insert(conn)
    .await?;
    info!(sheet_id = %created.id, owner_id = %owner_id, kind = kind.as_str(), "Sheet created");
    Ok(created)
}

/// Lazy lookup usable inside a caller's transaction; the transfer path leans
/// on this to materialize Kahon sheets on first use.
pub(crate) async fn get_or_create_sheet_on<C: ConnectionTrait>(
    conn: &C,
    owner_id: Uuid,
    kind: SheetKind,
    columns: i32,
) -> Result<sheet::Model, ServiceError> {
    match find_sheet(conn, owner_id, kind).await? {
        Some(found) => Ok(found),
        None => create_sheet_on(conn, owner_id, kind, columns).await,
    }
}

/// Index one past the current last row, i.e. where an appended row goes.
pub(crate) async fn next_row_index<C: ConnectionTrait>(
    conn: &C,
    sheet_id: Uuid,
) -> Result<i32, ServiceError> {
    let last = grid_row::Entity::find()
        .filter(grid_row::Column::SheetId.eq(sheet_id))
        .order_by_desc(grid_row::Column::RowIndex)
        .one(conn)
        .await?;
    Ok(last.map(|row| row.row_index + 1).unwrap_or(0))
}

pub(crate) async fn insert_item_row_on<C: ConnectionTrait>(
    conn: &C,
    sheet_model: &sheet::Model,
    item_id: Uuid,
    row_index: i32,
    quantity: i32,
    name: &str,
) -> Result<grid_row::Model, ServiceError> {
    let quantity_text = quantity.to_string();
    let cells = seed_cells(sheet_model.columns, Some(&quantity_text), Some(name));
    insert_row_with_cells(conn, sheet_model.id, row_index, true, Some(item_id), cells).await
}

/// Seeds one value per column: column 0 / column 1 as given, the rest empty
/// strings so every cell exists from the start.
fn seed_cells(columns: i32, col0: Option<&str>, col1: Option<&str>) -> Vec<String> {
    (0..columns.max(0))
        .map(|index| match index {
            0 => col0.unwrap_or("").to_string(),
            1 => col1.unwrap_or("").to_string(),
            _ => String::new(),
        })
        .collect()
}

async fn insert_row_with_cells<C: ConnectionTrait>(
    conn: &C,
    sheet_id: Uuid,
    row_index: i32,
    is_item_row: bool,
    item_id: Option<Uuid>,
    cell_values: Vec<String>,
) -> Result<grid_row::Model, ServiceError> {
    let now = Utc::now();
    let row = grid_row::ActiveModel {
        id: Set(Uuid::new_v4()),
        sheet_id: Set(sheet_id),
        row_index: Set(row_index),
        is_item_row: Set(is_item_row),
        item_id: Set(item_id),
        created_at: Set(now),
    }
    .insert(conn)
    .await?;

    for (column_index, value) in cell_values.into_iter().enumerate() {
        grid_cell::ActiveModel {
            id: Set(Uuid::new_v4()),
            row_id: Set(row.id),
            column_index: Set(column_index as i32),
            value: Set(value),
            formula: Set(None),
            is_calculated: Set(false),
            color: Set(None),
            created_at: Set(now),
            updated_at: Set(None),
        }
        .insert(conn)
        .await?;
    }

    Ok(row)
}

async fn require_sheet<C: ConnectionTrait>(
    conn: &C,
    sheet_id: Uuid,
) -> Result<sheet::Model, ServiceError> {
    sheet::Entity::find_by_id(sheet_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Sheet", sheet_id))
}

async fn validate_mappings_on<C: ConnectionTrait>(
    conn: &C,
    mappings: &[RowMappingInput],
    sheet_id: Uuid,
) -> Result<RowMappingValidation, ServiceError> {
    let mut validation = RowMappingValidation::default();

    let sheet_rows = grid_row::Entity::find()
        .filter(grid_row::Column::SheetId.eq(sheet_id))
        .all(conn)
        .await?;
    let sheet_row_ids: HashSet<Uuid> = sheet_rows.iter().map(|row| row.id).collect();
    let batched: HashSet<Uuid> = mappings.iter().map(|mapping| mapping.row_id).collect();

    // Indices that stay occupied because their row is not being moved; a
    // target landing on one of these would leave two rows sharing an index.
    let unmoved_indices: HashSet<i32> = sheet_rows
        .iter()
        .filter(|row| !batched.contains(&row.id))
        .map(|row| row.row_index)
        .collect();

    let mut seen = HashSet::new();
    for mapping in mappings {
        let collides =
            !seen.insert(mapping.row_index) || unmoved_indices.contains(&mapping.row_index);
        if collides && !validation.duplicate_indices.contains(&mapping.row_index) {
            validation.duplicate_indices.push(mapping.row_index);
        }
        if !sheet_row_ids.contains(&mapping.row_id) {
            validation.foreign_row_ids.push(mapping.row_id);
        }
    }

    Ok(validation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_cells_fills_leading_columns() {
        let cells = seed_cells(4, Some("12"), Some("Rice 25kg"));
        assert_eq!(cells, vec!["12", "Rice 25kg", "", ""]);
    }

    #[test]
    fn seed_cells_description_only() {
        let cells = seed_cells(3, None, Some("running total"));
        assert_eq!(cells, vec!["", "running total", ""]);
    }

    #[test]
    fn mapping_validation_reports_duplicates() {
        let mut validation = RowMappingValidation::default();
        assert!(validation.is_valid());
        validation.duplicate_indices.push(2);
        assert!(!validation.is_valid());
    }
}
