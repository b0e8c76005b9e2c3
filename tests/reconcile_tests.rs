// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{OWNER, RecordingSink, conn, day, dec};
use rust_decimal::Decimal;

use spendwise::alerts::Notifier;
use spendwise::error::Error;
use spendwise::models::{NewTransaction, PaymentMethod, updated_by};
use spendwise::onboarding::{setup_balances, skip_setup};
use spendwise::reconcile::{BalanceStatus, current_status, resolve_by_ledger, resolve_by_snapshot};
use spendwise::recorder::record;
use spendwise::store::{SnapshotStore, SqliteStore};

#[test]
fn recorded_activity_stays_in_sync() {
    let conn = conn();
    let store = SqliteStore::new(&conn);
    skip_setup(&store, OWNER).unwrap();
    let sink = RecordingSink::default();
    let notifier = Notifier::new(&sink, None);
    let today = day("2025-03-05");

    for (amt, method) in [("40", PaymentMethod::Cash), ("99.99", PaymentMethod::Online)] {
        let tx = NewTransaction::expense(dec(amt), "Food", today, method, today);
        record(&store, OWNER, &tx, today, &notifier).unwrap();
    }
    assert_eq!(current_status(&store, OWNER).unwrap(), BalanceStatus::InSync);
}

#[test]
fn opening_balance_without_history_is_discrepant_until_synced() {
    let conn = conn();
    let store = SqliteStore::new(&conn);
    setup_balances(&store, OWNER, Some(dec("1000")), None).unwrap();

    assert_eq!(
        current_status(&store, OWNER).unwrap(),
        BalanceStatus::Discrepant {
            online_delta: dec("1000"),
            cash_delta: Decimal::ZERO,
        }
    );

    let kept = resolve_by_snapshot(&store, OWNER).unwrap();
    assert_eq!(kept.online, dec("1000"));
    assert_eq!(kept.updated_by, updated_by::SYNC_TO_CURRENT);
    assert!(!current_status(&store, OWNER).unwrap().is_in_sync());

    let synced = resolve_by_ledger(&store, OWNER).unwrap();
    assert_eq!(synced.total(), Decimal::ZERO);
    assert_eq!(synced.updated_by, updated_by::SYNC_TO_TRANSACTIONS);
    assert_eq!(store.get(OWNER).unwrap().unwrap(), synced);
    assert!(current_status(&store, OWNER).unwrap().is_in_sync());
}

#[test]
fn historical_entry_that_skipped_snapshot_shows_up() {
    let conn = conn();
    let store = SqliteStore::new(&conn);
    skip_setup(&store, OWNER).unwrap();
    let sink = RecordingSink::default();
    let notifier = Notifier::new(&sink, None);
    let today = day("2025-03-05");

    let old = NewTransaction::expense(dec("60"), "Travel", day("2025-01-10"), PaymentMethod::Cash, today);
    record(&store, OWNER, &old, today, &notifier).unwrap();
    assert_eq!(
        current_status(&store, OWNER).unwrap(),
        BalanceStatus::Discrepant {
            online_delta: Decimal::ZERO,
            cash_delta: dec("60"),
        }
    );
}

#[test]
fn one_paisa_is_tolerated_two_are_not() {
    let conn = conn();
    let store = SqliteStore::new(&conn);
    setup_balances(&store, OWNER, Some(dec("0.01")), Some(dec("-0.01"))).unwrap();
    assert!(current_status(&store, OWNER).unwrap().is_in_sync());

    resolve_by_ledger(&store, OWNER).unwrap();
    let mut snap = store.get(OWNER).unwrap().unwrap();
    snap.cash = dec("0.02");
    store.put(OWNER, &snap).unwrap();
    assert!(!current_status(&store, OWNER).unwrap().is_in_sync());
}

#[test]
fn keeping_a_missing_snapshot_is_not_found() {
    let conn = conn();
    let store = SqliteStore::new(&conn);
    assert!(matches!(
        resolve_by_snapshot(&store, OWNER),
        Err(Error::NotFound(_))
    ));
    // Ledger sync creates the snapshot from nothing.
    let created = resolve_by_ledger(&store, OWNER).unwrap();
    assert_eq!(created.total(), Decimal::ZERO);
}
