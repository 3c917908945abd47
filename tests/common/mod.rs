//! Shared harness: an in-memory SQLite store with migrations applied and
//! every service wired against it.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use uuid::Uuid;

use bodega_core::config::AppConfig;
use bodega_core::db::{self, DbPool};
use bodega_core::entities::order::{self, OrderStatus};
use bodega_core::entities::sack_price::{self, SackKind};
use bodega_core::entities::{per_unit_price, product, special_price};
use bodega_core::events;
use bodega_core::services::AppServices;

pub struct TestApp {
    pub db: Arc<DbPool>,
    pub services: AppServices,
    pub event_sender: Arc<events::EventSender>,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Builds a fresh application state backed by in-memory SQLite. One
    /// connection, so the whole test sees one database.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new("sqlite::memory:".to_string(), "test".to_string());
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = Arc::new(
            db::establish_connection_from_app_config(&cfg)
                .await
                .expect("failed to create test database"),
        );
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations");

        let (event_sender, event_receiver) = events::event_channel(cfg.event_channel_capacity);
        let event_task = tokio::spawn(events::process_events(event_receiver));
        let event_sender = Arc::new(event_sender);

        let services = AppServices::new(pool.clone(), event_sender.clone(), &cfg);

        Self {
            db: pool,
            services,
            event_sender,
            _event_task: event_task,
        }
    }
}

/// Decimal with the same scale the store columns use.
pub fn dec(value: i64) -> Decimal {
    Decimal::new(value * 10_000, 4)
}

pub async fn create_product<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    cashier_id: Option<Uuid>,
) -> product::Model {
    product::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        cashier_id: Set(cashier_id),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    }
    .insert(conn)
    .await
    .expect("failed to insert product")
}

pub async fn create_sack_tier<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    kind: SackKind,
    price: Decimal,
    stock: i32,
) -> sack_price::Model {
    sack_price::ActiveModel {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        price: Set(price),
        stock: Set(stock),
        kind: Set(kind.as_str().to_string()),
        profit_margin: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    }
    .insert(conn)
    .await
    .expect("failed to insert sack tier")
}

pub async fn create_per_unit_tier<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    price: Decimal,
    stock: Decimal,
) -> per_unit_price::Model {
    per_unit_price::ActiveModel {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        price: Set(price),
        stock: Set(stock),
        profit_margin: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    }
    .insert(conn)
    .await
    .expect("failed to insert per-unit tier")
}

pub async fn create_special_price<C: ConnectionTrait>(
    conn: &C,
    sack_price_id: Uuid,
    price: Decimal,
    minimum_quantity: i32,
) -> special_price::Model {
    special_price::ActiveModel {
        id: Set(Uuid::new_v4()),
        sack_price_id: Set(sack_price_id),
        price: Set(price),
        minimum_quantity: Set(minimum_quantity),
        created_at: Set(Utc::now()),
    }
    .insert(conn)
    .await
    .expect("failed to insert special price")
}

pub async fn create_pending_order<C: ConnectionTrait>(
    conn: &C,
    cashier_id: Uuid,
    total: Decimal,
) -> order::Model {
    order::ActiveModel {
        id: Set(Uuid::new_v4()),
        cashier_id: Set(cashier_id),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        total: Set(total),
        sale_id: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    }
    .insert(conn)
    .await
    .expect("failed to insert order")
}
