//! Bodega Core
//!
//! Stock ledger and tabular grid engine for a rice-store back office:
//! UTC+8 business-day partitioning, per-tier stock counters, atomic
//! sale/delivery/transfer movements and a generic sheet/row/cell store.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod calendar;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod migrator;
pub mod services;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::events::EventSender;
use crate::services::AppServices;

/// Everything a host application needs to drive the ledger.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: AppConfig,
    pub event_sender: Arc<EventSender>,
    pub services: AppServices,
}

impl AppState {
    /// Connects the pool, optionally migrates, and wires services plus the
    /// event channel. The returned receiver is handed to
    /// [`events::process_events`] or a custom consumer.
    pub async fn initialize(
        config: AppConfig,
    ) -> Result<(Self, tokio::sync::mpsc::Receiver<events::Event>), AppError> {
        validator::Validate::validate(&config)
            .map_err(|e| AppError::ConfigError(e.to_string()))?;

        let db = Arc::new(db::establish_connection_from_app_config(&config).await?);

        if config.auto_migrate {
            db::run_migrations(&db).await?;
        }

        let (event_sender, event_receiver) = events::event_channel(config.event_channel_capacity);
        let event_sender = Arc::new(event_sender);

        let services = AppServices::new(db.clone(), event_sender.clone(), &config);

        Ok((
            Self {
                db,
                config,
                event_sender,
                services,
            },
            event_receiver,
        ))
    }
}
