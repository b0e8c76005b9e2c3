// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{EMAIL, OWNER, RecordingSink, conn, day, dec};
use rust_decimal::Decimal;

use spendwise::alerts::{Notifier, check_balance_alert};
use spendwise::models::{BalanceSnapshot, NewTransaction, PaymentMethod, TxType, updated_by};
use spendwise::notify::NotificationKind;
use spendwise::reconcile::{BalanceStatus, check_status, current_status, resolve_by_ledger, resolve_by_snapshot};
use spendwise::recorder::record;
use spendwise::store::{LedgerStore, SnapshotStore, SqliteStore, TransactionFilter};

#[test]
fn alert_sequence_fires_on_falling_edges_only() {
    let totals = ["1500", "900", "1100", "400"].map(dec);
    let mut low = 0;
    let mut critical = 0;
    for w in totals.windows(2) {
        for alert in check_balance_alert(w[0], w[1]) {
            match alert.kind {
                NotificationKind::LowBalance => low += 1,
                NotificationKind::CriticalBalance => critical += 1,
                other => panic!("unexpected {}", other),
            }
        }
    }
    assert_eq!(low, 2);
    assert_eq!(critical, 1);
}

#[test]
fn combined_total_decides_low_balance() {
    let conn = conn();
    let store = SqliteStore::new(&conn);
    store
        .put(OWNER, &BalanceSnapshot::new(dec("1200"), dec("300"), "setup"))
        .unwrap();
    let sink = RecordingSink::default();
    let notifier = Notifier::new(&sink, Some(EMAIL.into()));
    let today = day("2025-06-01");

    let tx = NewTransaction::expense(dec("250"), "Food", today, PaymentMethod::Online, today);
    let out = record(&store, OWNER, &tx, today, &notifier).unwrap();

    assert_eq!(out.transaction.amount, dec("250"));
    assert!(!out.transaction.is_historical);
    let snap = store.get(OWNER).unwrap().unwrap();
    assert_eq!(snap.online, dec("950"));
    assert_eq!(snap.cash, dec("300"));
    // 1250 overall is still above the low threshold.
    assert!(out.alerts.is_empty());
    assert!(sink.sent.borrow().is_empty());
}

#[test]
fn discrepancy_resolution_either_way() {
    let conn = conn();
    let store = SqliteStore::new(&conn);
    let today = day("2025-06-01");
    for amt in ["300", "200"] {
        let mut tx = NewTransaction::expense(dec(amt), "Salary", today, PaymentMethod::Online, today);
        tx.r#type = TxType::Income;
        store.append(OWNER, &tx).unwrap();
    }
    let stale = BalanceSnapshot::new(dec("800"), Decimal::ZERO, "setup");
    store.put(OWNER, &stale).unwrap();

    let txs = store.query(OWNER, &TransactionFilter::all()).unwrap();
    assert_eq!(
        check_status(&txs, Some(&stale)),
        BalanceStatus::Discrepant {
            online_delta: dec("300"),
            cash_delta: Decimal::ZERO,
        }
    );

    let kept = resolve_by_snapshot(&store, OWNER).unwrap();
    assert_eq!(kept.online, dec("800"));
    assert!(kept.last_updated >= stale.last_updated);
    let stored = store.get(OWNER).unwrap().unwrap();
    assert_eq!((stored.online, stored.cash), (dec("800"), Decimal::ZERO));
    assert_eq!(stored.updated_by, updated_by::SYNC_TO_CURRENT);

    let first = resolve_by_ledger(&store, OWNER).unwrap();
    let second = resolve_by_ledger(&store, OWNER).unwrap();
    assert_eq!(first.online, dec("500"));
    assert_eq!((first.online, first.cash), (second.online, second.cash));
    assert_eq!(current_status(&store, OWNER).unwrap(), BalanceStatus::InSync);
}

#[test]
fn tolerance_is_strictly_greater_than_one_paisa() {
    let today = day("2025-06-01");
    let mut tx = NewTransaction::expense(dec("10"), "Bills", today, PaymentMethod::Cash, today);
    tx.r#type = TxType::Income;
    let conn = conn();
    let store = SqliteStore::new(&conn);
    store.append(OWNER, &tx).unwrap();
    let txs = store.query(OWNER, &TransactionFilter::all()).unwrap();

    let at = BalanceSnapshot::new(Decimal::ZERO, dec("10.01"), "t");
    assert!(check_status(&txs, Some(&at)).is_in_sync());
    let over = BalanceSnapshot::new(Decimal::ZERO, dec("10.011"), "t");
    assert!(!check_status(&txs, Some(&over)).is_in_sync());
}
