// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("app", "SpendWise", "spendwise"));

/// Environment override for the database location.
pub const DB_ENV: &str = "SPENDWISE_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Ok(p) = std::env::var(DB_ENV) {
        if !p.trim().is_empty() {
            return Ok(PathBuf::from(p));
        }
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("spendwise.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        description TEXT,
        date TEXT NOT NULL,
        payment_method TEXT NOT NULL CHECK(payment_method IN ('online','cash')),
        created_at TEXT NOT NULL,
        is_historical INTEGER NOT NULL DEFAULT 0,
        is_balance_adjustment INTEGER NOT NULL DEFAULT 0,
        affect_current_balance INTEGER NOT NULL DEFAULT 1
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_owner_date ON transactions(owner, date);

    -- one row per owner: the current balance, independent of the ledger
    CREATE TABLE IF NOT EXISTS balances(
        owner TEXT PRIMARY KEY,
        online TEXT NOT NULL,
        cash TEXT NOT NULL,
        last_updated TEXT NOT NULL,
        updated_by TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS balance_adjustments(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner TEXT NOT NULL,
        online_delta TEXT NOT NULL,
        cash_delta TEXT NOT NULL,
        reason TEXT NOT NULL,
        previous_online TEXT NOT NULL,
        previous_cash TEXT NOT NULL,
        created_at TEXT NOT NULL,
        date TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_adjustments_owner ON balance_adjustments(owner, created_at);

    CREATE TABLE IF NOT EXISTS budgets(
        owner TEXT PRIMARY KEY,
        monthly_limit TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS recurring(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        payment_method TEXT NOT NULL CHECK(payment_method IN ('online','cash')),
        frequency TEXT NOT NULL CHECK(frequency IN ('weekly','monthly','yearly')),
        next_execution TEXT NOT NULL,
        last_executed TEXT,
        created_at TEXT NOT NULL
    );

    -- outbound mail picked up by an external sender
    CREATE TABLE IF NOT EXISTS mail_queue(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        kind TEXT NOT NULL,
        recipient TEXT NOT NULL,
        subject TEXT NOT NULL,
        payload TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        sent_at TEXT
    );
    "#,
    )
}
