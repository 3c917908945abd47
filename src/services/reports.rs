//! Day-partitioned reads.
//!
//! Every date-scoped query resolves its bounds through [`crate::calendar`],
//! so the whole crate shares one definition of where a business day starts
//! and ends.

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::calendar;
use crate::db::DbPool;
use crate::entities::sale::{self, PaymentMethod};
use crate::entities::sheet::{self, SheetKind};
use crate::entities::transfer::{self, TransferKind};
use crate::entities::{delivery, delivery_item, expense, grid_cell, grid_row, sale_item};
use crate::errors::ServiceError;
use crate::services::grid;

#[derive(Debug, Serialize, Deserialize)]
pub struct RowWithCells {
    pub row: grid_row::Model,
    pub cells: Vec<grid_cell::Model>,
}

/// A sheet restricted to the rows created on one business day.
#[derive(Debug, Serialize, Deserialize)]
pub struct SheetForDay {
    pub sheet: sheet::Model,
    pub rows: Vec<RowWithCells>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CashSalesReport {
    pub sales: Vec<sale::Model>,
    pub total: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExpensesReport {
    pub expenses: Vec<expense::Model>,
    pub total: Decimal,
}

/// Per-product movement across the three ledger paths for one day.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProductMovementStats {
    pub sold: Decimal,
    pub delivered: Decimal,
    pub transferred: Decimal,
}

#[derive(Clone, Debug)]
pub struct ReportService {
    db_pool: Arc<DbPool>,
    default_sheet_columns: i32,
}

impl ReportService {
    pub fn new(db_pool: Arc<DbPool>, default_sheet_columns: i32) -> Self {
        Self {
            db_pool,
            default_sheet_columns,
        }
    }

    /// The owner's sheet of the given kind (created lazily if absent) with
    /// only the rows whose creation falls inside the requested day.
    #[instrument(skip(self), fields(owner_id = %owner_id, kind = kind.as_str()))]
    pub async fn sheet_for_day(
        &self,
        owner_id: Uuid,
        kind: SheetKind,
        date: Option<&str>,
    ) -> Result<SheetForDay, ServiceError> {
        let bounds = calendar::business_day_bounds(date)?;
        let db = self.db_pool.as_ref();

        let sheet_model =
            grid::get_or_create_sheet_on(db, owner_id, kind, self.default_sheet_columns).await?;

        let day_rows = grid_row::Entity::find()
            .filter(grid_row::Column::SheetId.eq(sheet_model.id))
            .filter(grid_row::Column::CreatedAt.between(bounds.start, bounds.end))
            .order_by_asc(grid_row::Column::RowIndex)
            .all(db)
            .await?;

        let mut rows = Vec::with_capacity(day_rows.len());
        for row in day_rows {
            let cells = grid_cell::Entity::find()
                .filter(grid_cell::Column::RowId.eq(row.id))
                .order_by_asc(grid_cell::Column::ColumnIndex)
                .all(db)
                .await?;
            rows.push(RowWithCells { row, cells });
        }

        Ok(SheetForDay {
            sheet: sheet_model,
            rows,
        })
    }

    /// Non-voided cash sales of one cashier for one day, with their sum.
    #[instrument(skip(self), fields(cashier_id = %cashier_id))]
    pub async fn cash_sales_for_day(
        &self,
        cashier_id: Uuid,
        date: Option<&str>,
    ) -> Result<CashSalesReport, ServiceError> {
        let bounds = calendar::business_day_bounds(date)?;

        let sales = sale::Entity::find()
            .filter(sale::Column::CashierId.eq(cashier_id))
            .filter(sale::Column::PaymentMethod.eq(PaymentMethod::Cash.as_str()))
            .filter(sale::Column::Voided.eq(false))
            .filter(sale::Column::CreatedAt.between(bounds.start, bounds.end))
            .order_by_desc(sale::Column::CreatedAt)
            .all(self.db_pool.as_ref())
            .await?;

        let total = sales.iter().map(|s| s.total_amount).sum();
        Ok(CashSalesReport { sales, total })
    }

    /// A cashier's expenses for one day, with their sum.
    #[instrument(skip(self), fields(cashier_id = %cashier_id))]
    pub async fn expenses_for_day(
        &self,
        cashier_id: Uuid,
        date: Option<&str>,
    ) -> Result<ExpensesReport, ServiceError> {
        let bounds = calendar::business_day_bounds(date)?;

        let expenses = expense::Entity::find()
            .filter(expense::Column::CashierId.eq(cashier_id))
            .filter(expense::Column::CreatedAt.between(bounds.start, bounds.end))
            .order_by_desc(expense::Column::CreatedAt)
            .all(self.db_pool.as_ref())
            .await?;

        let total = expenses.iter().map(|e| e.amount).sum();
        Ok(ExpensesReport { expenses, total })
    }

    /// Per-product sold / delivered / transferred quantities for one day,
    /// aggregated across all cashiers.
    #[instrument(skip(self))]
    pub async fn stock_movement_stats_for_day(
        &self,
        date: Option<&str>,
    ) -> Result<BTreeMap<Uuid, ProductMovementStats>, ServiceError> {
        let bounds = calendar::business_day_bounds(date)?;
        let db = self.db_pool.as_ref();
        let mut stats: BTreeMap<Uuid, ProductMovementStats> = BTreeMap::new();

        let day_sales = sale::Entity::find()
            .filter(sale::Column::CreatedAt.between(bounds.start, bounds.end))
            .filter(sale::Column::Voided.eq(false))
            .all(db)
            .await?;
        for sale_model in &day_sales {
            let items = sale_item::Entity::find()
                .filter(sale_item::Column::SaleId.eq(sale_model.id))
                .all(db)
                .await?;
            for item in items {
                stats.entry(item.product_id).or_default().sold += item.quantity;
            }
        }

        let day_deliveries = delivery::Entity::find()
            .filter(delivery::Column::CreatedAt.between(bounds.start, bounds.end))
            .all(db)
            .await?;
        for delivery_model in &day_deliveries {
            let items = delivery_item::Entity::find()
                .filter(delivery_item::Column::DeliveryId.eq(delivery_model.id))
                .all(db)
                .await?;
            for item in items {
                stats.entry(item.product_id).or_default().delivered += item.quantity;
            }
        }

        // Zero-quantity delivery audit records contribute nothing; the real
        // delivered weight is already counted above.
        let day_transfers = transfer::Entity::find()
            .filter(transfer::Column::CreatedAt.between(bounds.start, bounds.end))
            .filter(transfer::Column::Kind.ne(TransferKind::Delivery.as_str()))
            .all(db)
            .await?;
        for record in day_transfers {
            stats.entry(record.product_id).or_default().transferred += record.quantity;
        }

        Ok(stats)
    }
}
