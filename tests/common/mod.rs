#![allow(dead_code)]

use chrono::NaiveDate;
use shipping_ledger::config::DatabaseConfig;
use shipping_ledger::models::{ClientDraft, Currency, NewShipment, ShipmentType, ShipmentUpdate};
use shipping_ledger::{create_pool, run_migrations, ClientService};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// 每个测试独享的 SQLite 文件库, TempDir 随结构体释放
pub struct TestDb {
    pub pool: SqlitePool,
    _dir: TempDir,
}

impl TestDb {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("ledger.db").display()
        );
        let pool = create_pool(&DatabaseConfig {
            url,
            max_connections: 4,
        })
        .await
        .expect("failed to open test database");
        run_migrations(&pool).await.expect("failed to run migrations");

        Self { pool, _dir: dir }
    }

    pub async fn client(&self, name: &str) -> i64 {
        ClientService::new(self.pool.clone())
            .create_client(ClientDraft {
                name: name.to_string(),
                phone: None,
                history: String::new(),
                debt: 0.0,
                total_debts: 0.0,
            })
            .await
            .expect("failed to create client")
            .id
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn new_shipment(sender: i64, receiver: i64, ship_price: f64, paid: f64) -> NewShipment {
    NewShipment {
        shipment_type: ShipmentType::InputLoad,
        shipping_date: Some(date(2024, 3, 1)),
        sender_client_id: sender,
        receiver_client_id: receiver,
        paid,
        ship_price,
        currency: Currency::Dollar,
        note: "steel beams".to_string(),
    }
}

pub fn shipment_update(sender: i64, receiver: i64, ship_price: f64, paid: f64) -> ShipmentUpdate {
    ShipmentUpdate {
        shipment_type: ShipmentType::InputLoad,
        shipping_date: Some(date(2024, 3, 1)),
        receiving_date: Some(date(2024, 3, 9)),
        sender_client_id: sender,
        receiver_client_id: receiver,
        paid,
        ship_price,
        currency: Currency::Dollar,
        note: "steel beams".to_string(),
    }
}
