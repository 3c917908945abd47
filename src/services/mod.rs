pub mod deliveries;
pub mod expenses;
pub mod grid;
pub mod orders;
pub mod reports;
pub mod sales;
pub mod stock;
pub mod transfers;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::events::EventSender;

/// All services wired against one pool and one event channel.
#[derive(Clone, Debug)]
pub struct AppServices {
    pub sales: sales::SaleService,
    pub deliveries: deliveries::DeliveryService,
    pub transfers: transfers::TransferService,
    pub grid: grid::GridService,
    pub expenses: expenses::ExpenseService,
    pub reports: reports::ReportService,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, config: &AppConfig) -> Self {
        let txn_timeout = config.ledger_txn_timeout();
        Self {
            sales: sales::SaleService::new(
                db_pool.clone(),
                event_sender.clone(),
                txn_timeout,
            ),
            deliveries: deliveries::DeliveryService::new(
                db_pool.clone(),
                event_sender.clone(),
                txn_timeout,
            ),
            transfers: transfers::TransferService::new(
                db_pool.clone(),
                event_sender.clone(),
                txn_timeout,
                config.default_sheet_columns,
            ),
            grid: grid::GridService::new(
                db_pool.clone(),
                event_sender.clone(),
                txn_timeout,
                config.default_sheet_columns,
            ),
            expenses: expenses::ExpenseService::new(db_pool.clone(), event_sender),
            reports: reports::ReportService::new(db_pool, config.default_sheet_columns),
        }
    }
}
