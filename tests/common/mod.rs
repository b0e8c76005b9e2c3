// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::Value;

use spendwise::db::init_schema;
use spendwise::error::{Error, Result};
use spendwise::models::{BalanceAdjustment, BalanceSnapshot, NewTransaction, Transaction};
use spendwise::notify::{NotificationKind, NotificationSink};
use spendwise::store::{
    AdjustmentStore, LedgerStore, NewAdjustment, SnapshotStore, SqliteStore, TransactionFilter,
};

pub const OWNER: &str = "u1";
pub const EMAIL: &str = "me@example.com";

pub fn conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}

pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn rows(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap()
}

/// Keeps every notification it is handed; optionally rejects them all.
#[derive(Default)]
pub struct RecordingSink {
    pub sent: RefCell<Vec<(NotificationKind, String, Value)>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        RecordingSink {
            fail: true,
            ..Default::default()
        }
    }

    pub fn kinds(&self) -> Vec<NotificationKind> {
        self.sent.borrow().iter().map(|(k, _, _)| *k).collect()
    }
}

impl NotificationSink for RecordingSink {
    fn send(&self, kind: NotificationKind, recipient: &str, payload: &Value) -> Result<()> {
        if self.fail {
            return Err(Error::Notification("mail server down".into()));
        }
        self.sent
            .borrow_mut()
            .push((kind, recipient.to_string(), payload.clone()));
        Ok(())
    }
}

/// SQLite-backed store whose individual writes can be made to fail.
pub struct FlakyStore<'c> {
    pub inner: SqliteStore<'c>,
    pub fail_append: Cell<bool>,
    pub fail_put: Cell<bool>,
    pub fail_adjustment: Cell<bool>,
}

impl<'c> FlakyStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        FlakyStore {
            inner: SqliteStore::new(conn),
            fail_append: Cell::new(false),
            fail_put: Cell::new(false),
            fail_adjustment: Cell::new(false),
        }
    }
}

fn unavailable(what: &str) -> Error {
    Error::Io(std::io::Error::other(format!("{} unavailable", what)))
}

impl LedgerStore for FlakyStore<'_> {
    fn append(&self, owner: &str, tx: &NewTransaction) -> Result<Transaction> {
        if self.fail_append.get() {
            return Err(unavailable("ledger"));
        }
        self.inner.append(owner, tx)
    }

    fn query(&self, owner: &str, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        self.inner.query(owner, filter)
    }

    fn delete(&self, owner: &str, id: i64) -> Result<()> {
        self.inner.delete(owner, id)
    }
}

impl SnapshotStore for FlakyStore<'_> {
    fn get(&self, owner: &str) -> Result<Option<BalanceSnapshot>> {
        self.inner.get(owner)
    }

    fn put(&self, owner: &str, snapshot: &BalanceSnapshot) -> Result<()> {
        if self.fail_put.get() {
            return Err(unavailable("snapshot"));
        }
        self.inner.put(owner, snapshot)
    }
}

impl AdjustmentStore for FlakyStore<'_> {
    fn append_adjustment(&self, owner: &str, adj: &NewAdjustment) -> Result<BalanceAdjustment> {
        if self.fail_adjustment.get() {
            return Err(unavailable("adjustment log"));
        }
        self.inner.append_adjustment(owner, adj)
    }

    fn recent_adjustments(&self, owner: &str, limit: usize) -> Result<Vec<BalanceAdjustment>> {
        self.inner.recent_adjustments(owner, limit)
    }
}
