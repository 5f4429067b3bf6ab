use chrono::NaiveDate;
use ledger::{
    Direction, EntryState, EntryUpdate, ExpenseKind, ExpenseUpdate, LedgerError, Money, NewEntry,
    NewExpense, NewIncome,
};
use rust_decimal::Decimal;

mod common;

fn entry(direction: Direction, amount_cents: i64, day: u32) -> NewEntry {
    NewEntry {
        direction: Some(direction),
        category: "varios".to_string(),
        description: "movimiento".to_string(),
        amount: Money::new(amount_cents),
        value_date: NaiveDate::from_ymd_opt(2025, 12, day),
        created_by: "alice".to_string(),
        ..Default::default()
    }
}

fn expense(kind: ExpenseKind, name: &str, amount: Decimal, day: u32) -> NewExpense {
    NewExpense {
        kind,
        name: name.to_string(),
        category: "operacion".to_string(),
        amount,
        value_date: NaiveDate::from_ymd_opt(2025, 12, day),
        due_day: match kind {
            ExpenseKind::Fixed => Some(5),
            ExpenseKind::Variable => None,
        },
        created_by: "alice".to_string(),
        ..Default::default()
    }
}

fn income(concept: &str, amount_cents: i64, day: u32) -> NewIncome {
    NewIncome {
        concept: concept.to_string(),
        category: "ventas".to_string(),
        amount: Money::new(amount_cents),
        value_date: NaiveDate::from_ymd_opt(2025, 12, day),
        created_by: "alice".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn december_closes_on_the_expected_general_balance() {
    let ledger = common::ledger().await;
    let cash_box = common::open_box(&ledger, "Caja A", 12, 2025, 500_00).await;

    ledger
        .create_entry(cash_box.id, entry(Direction::Credit, 1000_00, 5))
        .await
        .unwrap();
    ledger
        .create_entry(cash_box.id, entry(Direction::Debit, 45_50, 10))
        .await
        .unwrap();

    let rent = ledger
        .create_expense(expense(ExpenseKind::Fixed, "Alquiler", Decimal::new(200, 0), 1))
        .await
        .unwrap();
    ledger.mark_expense_paid(rent.id, "alice").await.unwrap();
    ledger
        .create_expense(expense(
            ExpenseKind::Variable,
            "Utiles",
            Decimal::new(75, 0),
            12,
        ))
        .await
        .unwrap();

    let sale = ledger.create_income(income("Venta", 300_00, 15)).await.unwrap();
    ledger.mark_income_collected(sale.id, "alice").await.unwrap();
    ledger
        .create_income(income("Por cobrar", 150_00, 20))
        .await
        .unwrap();

    let summary = ledger.summarize(12, 2025).await.unwrap();

    assert_eq!(summary.box_credits, Money::new(1000_00));
    assert_eq!(summary.box_debits, Money::new(45_50));
    assert_eq!(summary.box_balance, Money::new(954_50));
    assert_eq!(summary.fixed_expenses, Money::new(200_00));
    assert_eq!(summary.variable_expenses, Money::new(75_00));
    assert_eq!(summary.paid_expenses, Money::new(200_00));
    assert_eq!(summary.pending_expenses, Money::new(75_00));
    assert_eq!(summary.collected_incomes, Money::new(300_00));
    assert_eq!(summary.pending_incomes, Money::new(150_00));
    assert_eq!(summary.general_balance, Money::new(1054_50));
}

#[tokio::test]
async fn out_of_month_records_are_excluded() {
    let ledger = common::ledger().await;
    let cash_box = common::open_box(&ledger, "Caja A", 12, 2025, 0).await;

    ledger
        .create_entry(cash_box.id, entry(Direction::Credit, 100_00, 5))
        .await
        .unwrap();
    let mut january = entry(Direction::Credit, 999_00, 5);
    january.value_date = NaiveDate::from_ymd_opt(2026, 1, 5);
    ledger.create_entry(cash_box.id, january).await.unwrap();

    ledger
        .create_expense(NewExpense {
            value_date: NaiveDate::from_ymd_opt(2026, 1, 3),
            ..expense(ExpenseKind::Variable, "Taxi enero", Decimal::new(30, 0), 3)
        })
        .await
        .unwrap();
    ledger
        .create_income(NewIncome {
            value_date: NaiveDate::from_ymd_opt(2026, 1, 8),
            ..income("Venta enero", 40_00, 8)
        })
        .await
        .unwrap();

    let summary = ledger.summarize(12, 2025).await.unwrap();
    assert_eq!(summary.box_credits, Money::new(100_00));
    assert_eq!(summary.variable_expenses, Money::ZERO);
    assert_eq!(summary.pending_incomes, Money::ZERO);
}

#[tokio::test]
async fn voided_and_inactive_records_are_excluded() {
    let ledger = common::ledger().await;
    let cash_box = common::open_box(&ledger, "Caja A", 12, 2025, 0).await;

    let voided = ledger
        .create_entry(cash_box.id, entry(Direction::Credit, 500_00, 5))
        .await
        .unwrap();
    ledger
        .update_entry(
            voided.id,
            EntryUpdate {
                state: Some(EntryState::Voided),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    ledger
        .create_entry(cash_box.id, entry(Direction::Credit, 100_00, 6))
        .await
        .unwrap();

    let inactive = ledger
        .create_expense(NewExpense {
            active: false,
            ..expense(ExpenseKind::Fixed, "Seguro viejo", Decimal::new(90, 0), 1)
        })
        .await
        .unwrap();
    assert!(!inactive.active);
    let cancelled = ledger
        .create_expense(expense(
            ExpenseKind::Variable,
            "Compra anulada",
            Decimal::new(60, 0),
            9,
        ))
        .await
        .unwrap();
    ledger
        .update_expense(
            cancelled.id,
            ExpenseUpdate {
                state: Some(ledger::ExpenseState::Voided),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let summary = ledger.summarize(12, 2025).await.unwrap();
    assert_eq!(summary.box_credits, Money::new(100_00));
    assert_eq!(summary.fixed_expenses, Money::ZERO);
    assert_eq!(summary.variable_expenses, Money::ZERO);
    assert_eq!(summary.pending_expenses, Money::ZERO);
    assert_eq!(summary.general_balance, Money::new(100_00));
}

#[tokio::test]
async fn empty_month_yields_zeroed_summary() {
    let ledger = common::ledger().await;

    let summary = ledger.summarize(6, 2025).await.unwrap();
    assert_eq!(summary.month, 6);
    assert_eq!(summary.year, 2025);
    assert_eq!(summary.box_balance, Money::ZERO);
    assert_eq!(summary.general_balance, Money::ZERO);
}

#[tokio::test]
async fn invalid_period_is_rejected() {
    let ledger = common::ledger().await;

    let err = ledger.summarize(13, 2025).await.unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    let err = ledger.summarize(0, 2025).await.unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}
