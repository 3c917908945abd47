mod common;

use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use bodega_core::entities::sack_price::{self, SackKind};
use bodega_core::entities::sheet::{self, SheetKind};
use bodega_core::entities::transfer::{self, TransferKind};
use bodega_core::entities::{grid_cell, grid_row, kahon_item, per_unit_price};
use bodega_core::services::transfers::{CreateTransferRequest, TransferOutcome};

use common::{create_per_unit_tier, create_product, create_sack_tier, dec as money, TestApp};

#[tokio::test]
async fn kahon_transfer_materializes_item_and_grid_row() {
    let app = TestApp::new().await;
    let cashier = Uuid::new_v4();
    let product = create_product(app.db.as_ref(), "Jasmine Rice", Some(cashier)).await;
    let tier = create_sack_tier(
        app.db.as_ref(),
        product.id,
        SackKind::TwentyFiveKg,
        money(1500),
        50,
    )
    .await;

    let outcome = app
        .services
        .transfers
        .create_transfer(
            cashier,
            CreateTransferRequest {
                product_id: product.id,
                sack_price_id: Some(tier.id),
                per_unit_price_id: None,
                quantity: dec!(4),
                kind: TransferKind::Kahon,
            },
        )
        .await
        .expect("transfer should succeed");

    let (item, row) = match outcome {
        TransferOutcome::Kahon { item, row } => (item, row),
        TransferOutcome::Ledger(_) => panic!("kahon transfer must not produce a ledger record"),
    };
    assert_eq!(item.quantity, 4);
    assert_eq!(item.name, "Jasmine Rice");
    assert_eq!(row.item_id, Some(item.id));
    assert!(row.is_item_row);
    assert_eq!(row.row_index, 0);

    // Source counter moved, sheet was auto-created, no transfer record.
    let stock = sack_price::Entity::find_by_id(tier.id)
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap()
        .stock;
    assert_eq!(stock, 46);

    let sheets = sheet::Entity::find().all(app.db.as_ref()).await.unwrap();
    assert_eq!(sheets.len(), 1);
    assert_eq!(sheets[0].owner_id, cashier);
    assert_eq!(sheets[0].kind, SheetKind::Kahon.as_str());

    assert!(transfer::Entity::find()
        .all(app.db.as_ref())
        .await
        .unwrap()
        .is_empty());

    // Column 0 = quantity, column 1 = name, rest pre-created empty.
    let cells = grid_cell::Entity::find()
        .filter(grid_cell::Column::RowId.eq(row.id))
        .all(app.db.as_ref())
        .await
        .unwrap();
    assert_eq!(cells.len(), sheets[0].columns as usize);
    let col0 = cells.iter().find(|c| c.column_index == 0).unwrap();
    let col1 = cells.iter().find(|c| c.column_index == 1).unwrap();
    assert_eq!(col0.value, "4");
    assert_eq!(col1.value, "Jasmine Rice");
    assert!(cells
        .iter()
        .filter(|c| c.column_index > 1)
        .all(|c| c.value.is_empty()));
}

#[tokio::test]
async fn per_unit_kahon_transfer_encodes_weight_in_name() {
    let app = TestApp::new().await;
    let cashier = Uuid::new_v4();
    let product = create_product(app.db.as_ref(), "Dinorado", Some(cashier)).await;
    let tier = create_per_unit_tier(app.db.as_ref(), product.id, money(62), dec!(80)).await;

    let outcome = app
        .services
        .transfers
        .create_transfer(
            cashier,
            CreateTransferRequest {
                product_id: product.id,
                sack_price_id: None,
                per_unit_price_id: Some(tier.id),
                quantity: dec!(12.5),
                kind: TransferKind::Kahon,
            },
        )
        .await
        .unwrap();

    let item = match outcome {
        TransferOutcome::Kahon { item, .. } => item,
        TransferOutcome::Ledger(_) => panic!("expected kahon outcome"),
    };
    assert_eq!(item.quantity, 0);
    assert_eq!(item.name, "Dinorado (12.5 kg)");

    let stock = per_unit_price::Entity::find_by_id(tier.id)
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap()
        .stock;
    assert_eq!(stock, dec!(67.5));
}

#[tokio::test]
async fn own_consumption_transfer_is_a_standalone_record() {
    let app = TestApp::new().await;
    let cashier = Uuid::new_v4();
    let product = create_product(app.db.as_ref(), "Sinandomeng", Some(cashier)).await;
    let tier = create_sack_tier(
        app.db.as_ref(),
        product.id,
        SackKind::FiveKg,
        money(320),
        30,
    )
    .await;

    let outcome = app
        .services
        .transfers
        .create_transfer(
            cashier,
            CreateTransferRequest {
                product_id: product.id,
                sack_price_id: Some(tier.id),
                per_unit_price_id: None,
                quantity: dec!(2),
                kind: TransferKind::OwnConsumption,
            },
        )
        .await
        .unwrap();

    let record = match outcome {
        TransferOutcome::Ledger(record) => record,
        TransferOutcome::Kahon { .. } => panic!("expected ledger record"),
    };
    assert_eq!(record.kind, TransferKind::OwnConsumption.as_str());
    assert_eq!(record.quantity, dec!(2));

    // No kahon item, no sheet, no grid rows.
    assert!(kahon_item::Entity::find()
        .all(app.db.as_ref())
        .await
        .unwrap()
        .is_empty());
    assert!(sheet::Entity::find()
        .all(app.db.as_ref())
        .await
        .unwrap()
        .is_empty());
    assert!(grid_row::Entity::find()
        .all(app.db.as_ref())
        .await
        .unwrap()
        .is_empty());

    let stock = sack_price::Entity::find_by_id(tier.id)
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap()
        .stock;
    assert_eq!(stock, 28);

    let fetched = app
        .services
        .transfers
        .get_transfer(record.id)
        .await
        .unwrap();
    assert_eq!(fetched.id, record.id);
}

#[tokio::test]
async fn consecutive_kahon_transfers_append_rows() {
    let app = TestApp::new().await;
    let cashier = Uuid::new_v4();
    let product = create_product(app.db.as_ref(), "Maharlika", Some(cashier)).await;
    let tier = create_sack_tier(
        app.db.as_ref(),
        product.id,
        SackKind::FiftyKg,
        money(2600),
        100,
    )
    .await;

    for quantity in [dec!(3), dec!(5)] {
        app.services
            .transfers
            .create_transfer(
                cashier,
                CreateTransferRequest {
                    product_id: product.id,
                    sack_price_id: Some(tier.id),
                    per_unit_price_id: None,
                    quantity,
                    kind: TransferKind::Kahon,
                },
            )
            .await
            .unwrap();
    }

    let mut rows = grid_row::Entity::find().all(app.db.as_ref()).await.unwrap();
    rows.sort_by_key(|r| r.row_index);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].row_index, 0);
    assert_eq!(rows[1].row_index, 1);

    // One sheet reused across both transfers.
    assert_eq!(
        sheet::Entity::find().all(app.db.as_ref()).await.unwrap().len(),
        1
    );
}
