use ledger::{
    CashBoxFilter, CashBoxState, CashBoxUpdate, Direction, LedgerError, Money, NewCashBox,
    NewEntry,
};

mod common;

#[tokio::test]
async fn create_applies_defaults() {
    let ledger = common::ledger().await;

    let cash_box = ledger
        .create_cash_box(NewCashBox {
            name: "Caja A".to_string(),
            month: 12,
            year: 2025,
            created_by: "alice".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(cash_box.state, CashBoxState::Open);
    assert_eq!(cash_box.initial_balance, Money::ZERO);
    assert_eq!(cash_box.current_balance, Money::ZERO);
    assert!(cash_box.closed_at.is_none());
    assert_eq!(cash_box.created_by, "alice");
}

#[tokio::test]
async fn create_rejects_duplicate_name_in_period() {
    let ledger = common::ledger().await;
    common::open_box(&ledger, "Caja A", 12, 2025, 0).await;

    let err = ledger
        .create_cash_box(NewCashBox {
            name: "Caja A".to_string(),
            month: 12,
            year: 2025,
            created_by: "bob".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::DuplicateCashBox);

    // Same name is fine in another period.
    ledger
        .create_cash_box(NewCashBox {
            name: "Caja A".to_string(),
            month: 1,
            year: 2026,
            created_by: "bob".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn create_rejects_invalid_period() {
    let ledger = common::ledger().await;

    let err = ledger
        .create_cash_box(NewCashBox {
            name: "Caja".to_string(),
            month: 13,
            year: 2025,
            created_by: "alice".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[tokio::test]
async fn initial_balance_edit_reconciles() {
    let ledger = common::ledger().await;
    let cash_box = common::open_box(&ledger, "Caja A", 12, 2025, 500_00).await;

    ledger
        .create_entry(
            cash_box.id,
            NewEntry {
                direction: Some(Direction::Credit),
                category: "ventas".to_string(),
                description: "venta mostrador".to_string(),
                amount: Money::new(100_00),
                created_by: "alice".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let updated = ledger
        .update_cash_box(
            cash_box.id,
            CashBoxUpdate {
                name: Some("Caja principal".to_string()),
                initial_balance: Some(Money::new(1000_00)),
                updated_by: Some("alice".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Caja principal");
    assert_eq!(updated.initial_balance, Money::new(1000_00));
    assert_eq!(updated.current_balance, Money::new(1100_00));
}

#[tokio::test]
async fn rename_to_existing_period_name_is_rejected() {
    let ledger = common::ledger().await;
    common::open_box(&ledger, "Caja A", 12, 2025, 0).await;
    let other = common::open_box(&ledger, "Caja B", 12, 2025, 0).await;

    let err = ledger
        .update_cash_box(
            other.id,
            CashBoxUpdate {
                name: Some("Caja A".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::DuplicateCashBox);
}

#[tokio::test]
async fn closed_box_rejects_edits_and_second_close() {
    let ledger = common::ledger().await;
    let cash_box = common::open_box(&ledger, "Caja A", 12, 2025, 0).await;

    let closed = ledger.close_cash_box(cash_box.id, "alice").await.unwrap();
    assert_eq!(closed.state, CashBoxState::Closed);
    assert!(closed.closed_at.is_some());
    assert_eq!(closed.closed_by.as_deref(), Some("alice"));

    let err = ledger
        .update_cash_box(
            cash_box.id,
            CashBoxUpdate {
                name: Some("Otra".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::CashBoxClosed);

    let err = ledger.close_cash_box(cash_box.id, "bob").await.unwrap_err();
    assert_eq!(err, LedgerError::CashBoxClosed);
}

#[tokio::test]
async fn under_count_freezes_entries() {
    let ledger = common::ledger().await;
    let cash_box = common::open_box(&ledger, "Caja A", 12, 2025, 0).await;

    let counted = ledger.begin_count(cash_box.id).await.unwrap();
    assert_eq!(counted.state, CashBoxState::UnderCount);

    let err = ledger
        .create_entry(
            cash_box.id,
            NewEntry {
                direction: Some(Direction::Credit),
                description: "venta".to_string(),
                amount: Money::new(100),
                created_by: "alice".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::CashBoxClosed);

    // A box under count can still be closed.
    ledger.close_cash_box(cash_box.id, "alice").await.unwrap();

    let err = ledger.begin_count(cash_box.id).await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidStateTransition(_)));
}

#[tokio::test]
async fn delete_cascades_entries() {
    let ledger = common::ledger().await;
    let cash_box = common::open_box(&ledger, "Caja A", 12, 2025, 0).await;
    ledger
        .create_entry(
            cash_box.id,
            NewEntry {
                direction: Some(Direction::Debit),
                description: "taxi".to_string(),
                amount: Money::new(20_00),
                created_by: "alice".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    ledger.delete_cash_box(cash_box.id).await.unwrap();

    let err = ledger.cash_box(cash_box.id).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
    let err = ledger
        .list_entries(cash_box.id, Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[tokio::test]
async fn closed_box_deletion_is_policy_gated() {
    let ledger = common::ledger().await;
    let cash_box = common::open_box(&ledger, "Caja A", 12, 2025, 0).await;
    ledger.close_cash_box(cash_box.id, "alice").await.unwrap();

    let err = ledger.delete_cash_box(cash_box.id).await.unwrap_err();
    assert_eq!(err, LedgerError::CashBoxLocked);

    let permissive = common::ledger_allowing_closed_deletes().await;
    let cash_box = common::open_box(&permissive, "Caja B", 12, 2025, 0).await;
    permissive.close_cash_box(cash_box.id, "alice").await.unwrap();
    permissive.delete_cash_box(cash_box.id).await.unwrap();
}

#[tokio::test]
async fn under_count_box_deletion_is_policy_gated() {
    let ledger = common::ledger().await;
    let cash_box = common::open_box(&ledger, "Caja A", 12, 2025, 0).await;
    ledger.begin_count(cash_box.id).await.unwrap();

    let err = ledger.delete_cash_box(cash_box.id).await.unwrap_err();
    assert_eq!(err, LedgerError::CashBoxLocked);

    let permissive = common::ledger_allowing_closed_deletes().await;
    let cash_box = common::open_box(&permissive, "Caja B", 12, 2025, 0).await;
    permissive.begin_count(cash_box.id).await.unwrap();
    permissive.delete_cash_box(cash_box.id).await.unwrap();
}

#[tokio::test]
async fn list_filters_by_period_and_state() {
    let ledger = common::ledger().await;
    common::open_box(&ledger, "Caja A", 11, 2025, 0).await;
    let december = common::open_box(&ledger, "Caja B", 12, 2025, 0).await;
    let closed = common::open_box(&ledger, "Caja C", 12, 2025, 0).await;
    ledger.close_cash_box(closed.id, "alice").await.unwrap();

    let all = ledger.list_cash_boxes(Default::default()).await.unwrap();
    assert_eq!(all.len(), 3);

    let boxes = ledger
        .list_cash_boxes(CashBoxFilter {
            month: Some(12),
            year: Some(2025),
            state: Some(CashBoxState::Open),
        })
        .await
        .unwrap();
    assert_eq!(boxes.len(), 1);
    assert_eq!(boxes[0].id, december.id);
}
