mod common;

use assert_matches::assert_matches;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use bodega_core::entities::sheet::SheetKind;
use bodega_core::entities::{grid_cell, grid_row};
use bodega_core::errors::ServiceError;
use bodega_core::services::grid::{CellUpdateInput, RowMappingInput};

use common::TestApp;

#[tokio::test]
async fn sheet_is_created_lazily_and_reused() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();

    let first = app
        .services
        .grid
        .get_or_create_sheet(owner, SheetKind::Inventory)
        .await
        .unwrap();
    assert_eq!(first.name, "Inventory");
    assert_eq!(first.columns, 6);

    let second = app
        .services
        .grid
        .get_or_create_sheet(owner, SheetKind::Inventory)
        .await
        .unwrap();
    assert_eq!(second.id, first.id);

    // A different kind for the same owner is a different sheet.
    let kahon = app
        .services
        .grid
        .get_or_create_sheet(owner, SheetKind::Kahon)
        .await
        .unwrap();
    assert_ne!(kahon.id, first.id);
}

#[tokio::test]
async fn explicit_sheet_creation_rejects_duplicates() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();

    let created = app
        .services
        .grid
        .create_sheet(owner, SheetKind::Inventory, "August books".to_string(), 8)
        .await
        .unwrap();
    assert_eq!(created.name, "August books");
    assert_eq!(created.columns, 8);

    let duplicate = app
        .services
        .grid
        .create_sheet(owner, SheetKind::Inventory, "Again".to_string(), 4)
        .await;
    assert_matches!(duplicate, Err(ServiceError::InvalidOperation(_)));

    let too_narrow = app
        .services
        .grid
        .create_sheet(owner, SheetKind::Kahon, "Narrow".to_string(), 1)
        .await;
    assert_matches!(too_narrow, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn item_row_prepopulates_every_column() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let sheet = app
        .services
        .grid
        .get_or_create_sheet(owner, SheetKind::Kahon)
        .await
        .unwrap();

    let row = app
        .services
        .grid
        .add_item_row(sheet.id, Uuid::new_v4(), 0, 12, "Rice 25kg".to_string())
        .await
        .unwrap();
    assert!(row.is_item_row);

    let cells = grid_cell::Entity::find()
        .filter(grid_cell::Column::RowId.eq(row.id))
        .all(app.db.as_ref())
        .await
        .unwrap();
    assert_eq!(cells.len(), 6);
    assert_eq!(cells.iter().find(|c| c.column_index == 0).unwrap().value, "12");
    assert_eq!(
        cells.iter().find(|c| c.column_index == 1).unwrap().value,
        "Rice 25kg"
    );
}

#[tokio::test]
async fn calculation_row_carries_description_in_column_one() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let sheet = app
        .services
        .grid
        .get_or_create_sheet(owner, SheetKind::Kahon)
        .await
        .unwrap();

    let row = app
        .services
        .grid
        .add_calculation_row(sheet.id, 3, "running total".to_string())
        .await
        .unwrap();
    assert!(!row.is_item_row);
    assert_eq!(row.item_id, None);
    assert_eq!(row.row_index, 3);

    let cells = grid_cell::Entity::find()
        .filter(grid_cell::Column::RowId.eq(row.id))
        .all(app.db.as_ref())
        .await
        .unwrap();
    assert_eq!(
        cells.iter().find(|c| c.column_index == 1).unwrap().value,
        "running total"
    );
    assert!(cells.iter().find(|c| c.column_index == 0).unwrap().value.is_empty());
}

#[tokio::test]
async fn is_calculated_follows_formula_presence() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let sheet = app
        .services
        .grid
        .get_or_create_sheet(owner, SheetKind::Inventory)
        .await
        .unwrap();
    let row = app
        .services
        .grid
        .add_calculation_row(sheet.id, 0, "totals".to_string())
        .await
        .unwrap();

    let cell = app
        .services
        .grid
        .add_cell(
            row.id,
            2,
            "42".to_string(),
            Some("=SUM(A1:A5)".to_string()),
            None,
        )
        .await
        .unwrap();
    assert!(cell.is_calculated);
    assert_eq!(cell.formula.as_deref(), Some("=SUM(A1:A5)"));

    // Clearing the formula clears the flag.
    let updated = app
        .services
        .grid
        .update_cell(cell.id, "42".to_string(), None, Some("#ffeeaa".to_string()))
        .await
        .unwrap();
    assert!(!updated.is_calculated);
    assert_eq!(updated.formula, None);
    assert_eq!(updated.color.as_deref(), Some("#ffeeaa"));
}

#[tokio::test]
async fn add_cell_overwrites_the_seeded_cell_in_place() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let sheet = app
        .services
        .grid
        .get_or_create_sheet(owner, SheetKind::Kahon)
        .await
        .unwrap();
    // Row creation seeds a cell in every column; writing column 3 must land
    // in that cell rather than trip the per-column uniqueness.
    let row = app
        .services
        .grid
        .add_item_row(sheet.id, Uuid::new_v4(), 0, 5, "Rice".to_string())
        .await
        .unwrap();

    let written = app
        .services
        .grid
        .add_cell(row.id, 3, "880".to_string(), None, Some("#dfe8ff".to_string()))
        .await
        .unwrap();
    assert_eq!(written.value, "880");
    assert_eq!(written.color.as_deref(), Some("#dfe8ff"));

    let at_column = grid_cell::Entity::find()
        .filter(grid_cell::Column::RowId.eq(row.id))
        .filter(grid_cell::Column::ColumnIndex.eq(3))
        .all(app.db.as_ref())
        .await
        .unwrap();
    assert_eq!(at_column.len(), 1);
    assert_eq!(at_column[0].id, written.id);

    let total = grid_cell::Entity::find()
        .filter(grid_cell::Column::RowId.eq(row.id))
        .all(app.db.as_ref())
        .await
        .unwrap();
    assert_eq!(total.len() as i32, sheet.columns);
}

#[tokio::test]
async fn add_cell_rejects_out_of_range_column() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let sheet = app
        .services
        .grid
        .get_or_create_sheet(owner, SheetKind::Inventory)
        .await
        .unwrap();
    let row = app
        .services
        .grid
        .add_calculation_row(sheet.id, 0, "totals".to_string())
        .await
        .unwrap();

    let result = app
        .services
        .grid
        .add_cell(row.id, sheet.columns, "x".to_string(), None, None)
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn update_cells_applies_whole_batch() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let sheet = app
        .services
        .grid
        .get_or_create_sheet(owner, SheetKind::Kahon)
        .await
        .unwrap();
    let row = app
        .services
        .grid
        .add_item_row(sheet.id, Uuid::new_v4(), 0, 7, "Rice".to_string())
        .await
        .unwrap();

    let cells = grid_cell::Entity::find()
        .filter(grid_cell::Column::RowId.eq(row.id))
        .all(app.db.as_ref())
        .await
        .unwrap();

    let updates: Vec<CellUpdateInput> = cells
        .iter()
        .take(2)
        .map(|c| CellUpdateInput {
            cell_id: c.id,
            value: "changed".to_string(),
            formula: None,
            color: None,
        })
        .collect();
    let updated = app.services.grid.update_cells(updates).await.unwrap();
    assert_eq!(updated.len(), 2);
    assert!(updated.iter().all(|c| c.value == "changed"));
}

#[tokio::test]
async fn failed_cell_batch_changes_nothing() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let sheet = app
        .services
        .grid
        .get_or_create_sheet(owner, SheetKind::Kahon)
        .await
        .unwrap();
    let row = app
        .services
        .grid
        .add_item_row(sheet.id, Uuid::new_v4(), 0, 7, "Rice".to_string())
        .await
        .unwrap();

    let cells = grid_cell::Entity::find()
        .filter(grid_cell::Column::RowId.eq(row.id))
        .all(app.db.as_ref())
        .await
        .unwrap();

    let quantity_cell = cells.iter().find(|c| c.column_index == 0).unwrap();
    let updates = vec![
        CellUpdateInput {
            cell_id: quantity_cell.id,
            value: "changed".to_string(),
            formula: None,
            color: None,
        },
        CellUpdateInput {
            cell_id: Uuid::new_v4(),
            value: "orphan".to_string(),
            formula: None,
            color: None,
        },
    ];
    let result = app.services.grid.update_cells(updates).await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));

    let first = grid_cell::Entity::find_by_id(quantity_cell.id)
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.value, "7");
}

#[tokio::test]
async fn delete_row_removes_cells_first() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let sheet = app
        .services
        .grid
        .get_or_create_sheet(owner, SheetKind::Inventory)
        .await
        .unwrap();
    let row = app
        .services
        .grid
        .add_item_row(sheet.id, Uuid::new_v4(), 0, 3, "Rice".to_string())
        .await
        .unwrap();

    app.services.grid.delete_row(row.id).await.unwrap();

    assert!(grid_row::Entity::find()
        .all(app.db.as_ref())
        .await
        .unwrap()
        .is_empty());
    assert!(grid_cell::Entity::find()
        .all(app.db.as_ref())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn row_mapping_validation_flags_duplicates_and_foreign_rows() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let sheet = app
        .services
        .grid
        .get_or_create_sheet(owner, SheetKind::Kahon)
        .await
        .unwrap();
    let other_sheet = app
        .services
        .grid
        .get_or_create_sheet(Uuid::new_v4(), SheetKind::Kahon)
        .await
        .unwrap();

    let row_a = app
        .services
        .grid
        .add_item_row(sheet.id, Uuid::new_v4(), 0, 1, "A".to_string())
        .await
        .unwrap();
    let row_b = app
        .services
        .grid
        .add_item_row(sheet.id, Uuid::new_v4(), 1, 2, "B".to_string())
        .await
        .unwrap();
    let foreign = app
        .services
        .grid
        .add_item_row(other_sheet.id, Uuid::new_v4(), 0, 9, "X".to_string())
        .await
        .unwrap();

    let validation = app
        .services
        .grid
        .validate_row_mappings(
            &[
                RowMappingInput {
                    row_id: row_a.id,
                    row_index: 5,
                },
                RowMappingInput {
                    row_id: row_b.id,
                    row_index: 5,
                },
                RowMappingInput {
                    row_id: foreign.id,
                    row_index: 6,
                },
            ],
            sheet.id,
        )
        .await
        .unwrap();

    assert!(!validation.is_valid());
    assert_eq!(validation.duplicate_indices, vec![5]);
    assert_eq!(validation.foreign_row_ids, vec![foreign.id]);
}

#[tokio::test]
async fn rejected_reposition_mutates_nothing() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let sheet = app
        .services
        .grid
        .get_or_create_sheet(owner, SheetKind::Kahon)
        .await
        .unwrap();
    let row_a = app
        .services
        .grid
        .add_item_row(sheet.id, Uuid::new_v4(), 0, 1, "A".to_string())
        .await
        .unwrap();
    let row_b = app
        .services
        .grid
        .add_item_row(sheet.id, Uuid::new_v4(), 1, 2, "B".to_string())
        .await
        .unwrap();

    let result = app
        .services
        .grid
        .batch_update_row_positions(
            vec![
                RowMappingInput {
                    row_id: row_a.id,
                    row_index: 3,
                },
                RowMappingInput {
                    row_id: row_b.id,
                    row_index: 3,
                },
            ],
            sheet.id,
        )
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));

    let a = grid_row::Entity::find_by_id(row_a.id)
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    let b = grid_row::Entity::find_by_id(row_b.id)
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(a.row_index, 0);
    assert_eq!(b.row_index, 1);
}

#[tokio::test]
async fn reposition_onto_an_unmoved_rows_index_is_rejected() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let sheet = app
        .services
        .grid
        .get_or_create_sheet(owner, SheetKind::Kahon)
        .await
        .unwrap();
    let row_a = app
        .services
        .grid
        .add_item_row(sheet.id, Uuid::new_v4(), 0, 1, "A".to_string())
        .await
        .unwrap();
    let row_b = app
        .services
        .grid
        .add_item_row(sheet.id, Uuid::new_v4(), 1, 2, "B".to_string())
        .await
        .unwrap();

    // Moving only A onto B's index would leave two rows sharing index 1.
    let mappings = vec![RowMappingInput {
        row_id: row_a.id,
        row_index: 1,
    }];
    let validation = app
        .services
        .grid
        .validate_row_mappings(&mappings, sheet.id)
        .await
        .unwrap();
    assert!(!validation.is_valid());
    assert_eq!(validation.duplicate_indices, vec![1]);

    let result = app
        .services
        .grid
        .batch_update_row_positions(mappings, sheet.id)
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));

    let a = grid_row::Entity::find_by_id(row_a.id)
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    let b = grid_row::Entity::find_by_id(row_b.id)
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(a.row_index, 0);
    assert_eq!(b.row_index, 1);
}

#[tokio::test]
async fn valid_reposition_swaps_indices() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let sheet = app
        .services
        .grid
        .get_or_create_sheet(owner, SheetKind::Kahon)
        .await
        .unwrap();
    let row_a = app
        .services
        .grid
        .add_item_row(sheet.id, Uuid::new_v4(), 0, 1, "A".to_string())
        .await
        .unwrap();
    let row_b = app
        .services
        .grid
        .add_item_row(sheet.id, Uuid::new_v4(), 1, 2, "B".to_string())
        .await
        .unwrap();

    app.services
        .grid
        .batch_update_row_positions(
            vec![
                RowMappingInput {
                    row_id: row_a.id,
                    row_index: 1,
                },
                RowMappingInput {
                    row_id: row_b.id,
                    row_index: 0,
                },
            ],
            sheet.id,
        )
        .await
        .unwrap();

    let ordered = app.services.grid.rows_with_cells(sheet.id).await.unwrap();
    assert_eq!(ordered.len(), 2);
    assert_eq!(ordered[0].0.id, row_b.id);
    assert_eq!(ordered[1].0.id, row_a.id);

    // Indices stay unique after the reorder.
    let indices: Vec<i32> = ordered.iter().map(|(row, _)| row.row_index).collect();
    assert_eq!(indices, vec![0, 1]);
}

#[tokio::test]
async fn delete_cell_removes_only_that_cell() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let sheet = app
        .services
        .grid
        .get_or_create_sheet(owner, SheetKind::Inventory)
        .await
        .unwrap();
    let row = app
        .services
        .grid
        .add_item_row(sheet.id, Uuid::new_v4(), 0, 3, "Rice".to_string())
        .await
        .unwrap();

    let cells = grid_cell::Entity::find()
        .filter(grid_cell::Column::RowId.eq(row.id))
        .all(app.db.as_ref())
        .await
        .unwrap();
    let before = cells.len();

    app.services.grid.delete_cell(cells[0].id).await.unwrap();

    let after = grid_cell::Entity::find()
        .filter(grid_cell::Column::RowId.eq(row.id))
        .all(app.db.as_ref())
        .await
        .unwrap();
    assert_eq!(after.len(), before - 1);

    let missing = app.services.grid.delete_cell(cells[0].id).await;
    assert_matches!(missing, Err(ServiceError::NotFound(_)));
}
