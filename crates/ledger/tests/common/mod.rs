#![allow(dead_code)]

use ledger::{CashBox, Ledger, Money, NewCashBox};
use migration::MigratorTrait;
use sea_orm::Database;

pub async fn ledger() -> Ledger {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Ledger::builder().database(db).build()
}

pub async fn ledger_allowing_closed_deletes() -> Ledger {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Ledger::builder()
        .database(db)
        .delete_closed_boxes(true)
        .build()
}

pub async fn open_box(
    ledger: &Ledger,
    name: &str,
    month: u8,
    year: i32,
    initial_cents: i64,
) -> CashBox {
    ledger
        .create_cash_box(NewCashBox {
            name: name.to_string(),
            month,
            year,
            initial_balance: Some(Money::new(initial_cents)),
            created_by: "alice".to_string(),
            ..Default::default()
        })
        .await
        .unwrap()
}
