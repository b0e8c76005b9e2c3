// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{EMAIL, FlakyStore, OWNER, RecordingSink, conn, day, dec, rows};
use rust_decimal::Decimal;

use spendwise::adjust::{AdjustmentRequest, adjust_balances};
use spendwise::alerts::Notifier;
use spendwise::models::{BALANCE_ADJUSTMENT_CATEGORY, PaymentMethod, TxType};
use spendwise::notify::NotificationKind;
use spendwise::onboarding::{setup_balances, skip_setup};
use spendwise::reconcile::current_status;
use spendwise::store::{AdjustmentStore, SnapshotStore, SqliteStore};

fn req(online: Option<&str>, cash: Option<&str>, reason: &str) -> AdjustmentRequest {
    AdjustmentRequest {
        online: online.map(dec),
        cash: cash.map(dec),
        reason: reason.to_string(),
    }
}

#[test]
fn adjustment_writes_mirror_rows_record_and_snapshot() {
    let conn = conn();
    let store = SqliteStore::new(&conn);
    skip_setup(&store, OWNER).unwrap();
    let sink = RecordingSink::default();
    let notifier = Notifier::new(&sink, Some(EMAIL.into()));

    let out = adjust_balances(
        &store,
        OWNER,
        &req(Some("500"), Some("-200"), "found cash"),
        day("2025-03-05"),
        &notifier,
    )
    .unwrap();

    assert_eq!(out.synthetic.len(), 2);
    let online = &out.synthetic[0];
    assert_eq!(online.r#type, TxType::Income);
    assert_eq!(online.amount, dec("500"));
    assert_eq!(online.payment_method, PaymentMethod::Online);
    assert_eq!(online.category, BALANCE_ADJUSTMENT_CATEGORY);
    assert!(online.is_balance_adjustment);
    assert_eq!(
        online.description.as_deref(),
        Some("Online balance adjustment: found cash")
    );
    let cash = &out.synthetic[1];
    assert_eq!(cash.r#type, TxType::Expense);
    assert_eq!(cash.amount, dec("200"));

    assert_eq!(out.record.previous_online, Decimal::ZERO);
    assert_eq!(out.record.cash_delta, dec("-200"));

    let snap = store.get(OWNER).unwrap().unwrap();
    assert_eq!(snap.online, dec("500"));
    assert_eq!(snap.cash, dec("-200"));
    assert_eq!(snap.updated_by, "found cash");

    // Ledger and snapshot moved together.
    assert!(current_status(&store, OWNER).unwrap().is_in_sync());
    assert!(sink.kinds().contains(&NotificationKind::BalanceAdjustment));
}

#[test]
fn zero_side_gets_no_ledger_row() {
    let conn = conn();
    let store = SqliteStore::new(&conn);
    setup_balances(&store, OWNER, Some(dec("3000")), Some(dec("400"))).unwrap();
    let sink = RecordingSink::default();
    let notifier = Notifier::new(&sink, None);

    let out = adjust_balances(
        &store,
        OWNER,
        &req(Some("0"), Some("100"), "atm"),
        day("2025-03-05"),
        &notifier,
    )
    .unwrap();
    assert_eq!(out.synthetic.len(), 1);
    assert_eq!(out.synthetic[0].payment_method, PaymentMethod::Cash);
    assert_eq!(out.after.online, dec("3000"));
    assert_eq!(out.after.cash, dec("500"));
    assert_eq!(rows(&conn), 1);
}

#[test]
fn rejected_requests_write_nothing() {
    let conn = conn();
    let store = SqliteStore::new(&conn);
    setup_balances(&store, OWNER, Some(dec("3000")), None).unwrap();
    let before = store.get(OWNER).unwrap();
    let sink = RecordingSink::default();
    let notifier = Notifier::new(&sink, Some(EMAIL.into()));
    let today = day("2025-03-05");

    for bad in [
        req(None, None, "nothing"),
        req(Some("0"), Some("0"), "zeros"),
        req(Some("10"), None, "   "),
        req(None, Some("-50000000000000000000000000000"), "typo"),
    ] {
        let err = adjust_balances(&store, OWNER, &bad, today, &notifier).unwrap_err();
        assert!(err.is_validation());
    }
    assert_eq!(rows(&conn), 0);
    assert!(store.recent_adjustments(OWNER, 5).unwrap().is_empty());
    assert_eq!(store.get(OWNER).unwrap(), before);
    assert!(sink.sent.borrow().is_empty());
}

#[test]
fn missing_snapshot_is_treated_as_zero() {
    let conn = conn();
    let store = SqliteStore::new(&conn);
    let sink = RecordingSink::default();
    let notifier = Notifier::new(&sink, None);

    let out = adjust_balances(
        &store,
        OWNER,
        &req(None, Some("250"), "wallet count"),
        day("2025-03-05"),
        &notifier,
    )
    .unwrap();
    assert_eq!(out.before.total(), Decimal::ZERO);
    assert_eq!(store.get(OWNER).unwrap().unwrap().cash, dec("250"));
}

#[test]
fn interrupted_adjustment_is_detectable() {
    let conn = conn();
    let store = FlakyStore::new(&conn);
    skip_setup(&store, OWNER).unwrap();
    store.fail_adjustment.set(true);
    let sink = RecordingSink::default();
    let notifier = Notifier::new(&sink, None);

    let res = adjust_balances(
        &store,
        OWNER,
        &req(Some("-40"), None, "fees"),
        day("2025-03-05"),
        &notifier,
    );
    assert!(res.is_err());
    assert_eq!(rows(&conn), 1);
    assert_eq!(store.get(OWNER).unwrap().unwrap().online, Decimal::ZERO);
    assert!(!current_status(&store, OWNER).unwrap().is_in_sync());
}

#[test]
fn recent_adjustments_newest_first() {
    let conn = conn();
    let store = SqliteStore::new(&conn);
    skip_setup(&store, OWNER).unwrap();
    let sink = RecordingSink::default();
    let notifier = Notifier::new(&sink, None);
    let today = day("2025-03-05");

    for reason in ["first", "second", "third"] {
        adjust_balances(&store, OWNER, &req(Some("1"), None, reason), today, &notifier).unwrap();
    }
    let recent = store.recent_adjustments(OWNER, 2).unwrap();
    let reasons: Vec<_> = recent.iter().map(|a| a.reason.as_str()).collect();
    assert_eq!(reasons, vec!["third", "second"]);
    assert_eq!(recent[0].previous_online, dec("2"));
    assert!(store.recent_adjustments("someone-else", 5).unwrap().is_empty());
}

#[test]
fn falling_adjustment_runs_the_crossing_check() {
    let conn = conn();
    let store = SqliteStore::new(&conn);
    setup_balances(&store, OWNER, Some(dec("1200")), None).unwrap();
    let sink = RecordingSink::default();
    let notifier = Notifier::new(&sink, Some(EMAIL.into()));
    let today = day("2025-03-05");

    adjust_balances(&store, OWNER, &req(Some("-800"), None, "rent paid elsewhere"), today, &notifier)
        .unwrap();
    assert_eq!(
        sink.kinds(),
        vec![
            NotificationKind::LowBalance,
            NotificationKind::CriticalBalance,
            NotificationKind::BalanceAdjustment,
        ]
    );

    sink.sent.borrow_mut().clear();
    let out = adjust_balances(&store, OWNER, &req(Some("900"), None, "refund"), today, &notifier)
        .unwrap();
    assert_eq!(out.after.total(), dec("1300"));
    assert_eq!(sink.kinds(), vec![NotificationKind::BalanceAdjustment]);
}
