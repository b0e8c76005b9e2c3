// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Persistence seams for the ledger, the balance snapshot and the
//! adjustment audit trail, with the SQLite implementation used by the CLI.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::{
    BalanceAdjustment, BalanceSnapshot, NewTransaction, PaymentMethod, Transaction, TxType,
};

/// Query filters for the ledger. Every field narrows the result.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub month: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub r#type: Option<TxType>,
    pub payment_method: Option<PaymentMethod>,
    pub category: Option<String>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn on(date: NaiveDate) -> Self {
        TransactionFilter {
            from: Some(date),
            to: Some(date),
            ..Self::default()
        }
    }

    pub fn month(month: &str) -> Self {
        TransactionFilter {
            month: Some(month.to_string()),
            ..Self::default()
        }
    }

    pub fn of_type(mut self, ty: TxType) -> Self {
        self.r#type = Some(ty);
        self
    }
}

/// Append-only transaction ledger.
pub trait LedgerStore {
    fn append(&self, owner: &str, tx: &NewTransaction) -> Result<Transaction>;
    /// Newest first: date descending, then insertion order descending.
    fn query(&self, owner: &str, filter: &TransactionFilter) -> Result<Vec<Transaction>>;
    fn delete(&self, owner: &str, id: i64) -> Result<()>;
}

/// One current-balance document per owner. Writes are last-write-wins.
pub trait SnapshotStore {
    fn get(&self, owner: &str) -> Result<Option<BalanceSnapshot>>;
    fn put(&self, owner: &str, snapshot: &BalanceSnapshot) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct NewAdjustment {
    pub online_delta: Decimal,
    pub cash_delta: Decimal,
    pub reason: String,
    pub previous_online: Decimal,
    pub previous_cash: Decimal,
    pub date: NaiveDate,
}

pub trait AdjustmentStore {
    fn append_adjustment(&self, owner: &str, adj: &NewAdjustment) -> Result<BalanceAdjustment>;
    fn recent_adjustments(&self, owner: &str, limit: usize) -> Result<Vec<BalanceAdjustment>>;
}

pub(crate) fn parse_amount(raw: &str, what: &str) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .map_err(|e| Error::InvalidData(format!("invalid {} '{}': {}", what, raw, e)))
}

pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        SqliteStore { conn }
    }

    pub fn conn(&self) -> &'c Connection {
        self.conn
    }
}

const TX_COLUMNS: &str = "id, owner, type, amount, category, description, date, payment_method, \
     created_at, is_historical, is_balance_adjustment, affect_current_balance";

fn read_transaction(r: &Row<'_>) -> Result<Transaction> {
    let ty: String = r.get(2)?;
    let amount: String = r.get(3)?;
    let method: String = r.get(7)?;
    Ok(Transaction {
        id: r.get(0)?,
        owner: r.get(1)?,
        r#type: ty.parse()?,
        amount: parse_amount(&amount, "amount")?,
        category: r.get(4)?,
        description: r.get(5)?,
        date: r.get(6)?,
        payment_method: method.parse()?,
        created_at: r.get(8)?,
        is_historical: r.get(9)?,
        is_balance_adjustment: r.get(10)?,
        affect_current_balance: r.get(11)?,
    })
}

impl LedgerStore for SqliteStore<'_> {
    fn append(&self, owner: &str, tx: &NewTransaction) -> Result<Transaction> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO transactions(owner, type, amount, category, description, date, payment_method,
                created_at, is_historical, is_balance_adjustment, affect_current_balance)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                owner,
                tx.r#type.as_str(),
                tx.amount.to_string(),
                tx.category,
                tx.description,
                tx.date,
                tx.payment_method.as_str(),
                created_at,
                tx.is_historical,
                tx.is_balance_adjustment,
                tx.affect_current_balance,
            ],
        )?;
        Ok(Transaction {
            id: self.conn.last_insert_rowid(),
            owner: owner.to_string(),
            r#type: tx.r#type,
            amount: tx.amount,
            category: tx.category.clone(),
            description: tx.description.clone(),
            date: tx.date,
            payment_method: tx.payment_method,
            created_at,
            is_historical: tx.is_historical,
            is_balance_adjustment: tx.is_balance_adjustment,
            affect_current_balance: tx.affect_current_balance,
        })
    }

    fn query(&self, owner: &str, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let mut sql = format!("SELECT {} FROM transactions WHERE owner=?", TX_COLUMNS);
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(owner.to_string())];

        if let Some(month) = &filter.month {
            sql.push_str(" AND substr(date,1,7)=?");
            args.push(Box::new(month.clone()));
        }
        if let Some(from) = filter.from {
            sql.push_str(" AND date>=?");
            args.push(Box::new(from));
        }
        if let Some(to) = filter.to {
            sql.push_str(" AND date<=?");
            args.push(Box::new(to));
        }
        if let Some(ty) = filter.r#type {
            sql.push_str(" AND type=?");
            args.push(Box::new(ty.as_str()));
        }
        if let Some(method) = filter.payment_method {
            sql.push_str(" AND payment_method=?");
            args.push(Box::new(method.as_str()));
        }
        if let Some(cat) = &filter.category {
            sql.push_str(" AND category=?");
            args.push(Box::new(cat.clone()));
        }
        sql.push_str(" ORDER BY date DESC, id DESC");
        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            args.push(Box::new(limit as i64));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())))?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            out.push(read_transaction(r)?);
        }
        Ok(out)
    }

    fn delete(&self, owner: &str, id: i64) -> Result<()> {
        let n = self.conn.execute(
            "DELETE FROM transactions WHERE id=?1 AND owner=?2",
            params![id, owner],
        )?;
        if n == 0 {
            return Err(Error::NotFound(format!("transaction {}", id)));
        }
        Ok(())
    }
}

impl SnapshotStore for SqliteStore<'_> {
    fn get(&self, owner: &str) -> Result<Option<BalanceSnapshot>> {
        let raw: Option<(String, String, DateTime<Utc>, String)> = self
            .conn
            .query_row(
                "SELECT online, cash, last_updated, updated_by FROM balances WHERE owner=?1",
                params![owner],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
            )
            .optional()?;
        match raw {
            Some((online, cash, last_updated, updated_by)) => Ok(Some(BalanceSnapshot {
                online: parse_amount(&online, "online balance")?,
                cash: parse_amount(&cash, "cash balance")?,
                last_updated,
                updated_by,
            })),
            None => Ok(None),
        }
    }

    fn put(&self, owner: &str, snapshot: &BalanceSnapshot) -> Result<()> {
        self.conn.execute(
            "INSERT INTO balances(owner, online, cash, last_updated, updated_by)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(owner) DO UPDATE SET
                online=excluded.online,
                cash=excluded.cash,
                last_updated=excluded.last_updated,
                updated_by=excluded.updated_by",
            params![
                owner,
                snapshot.online.to_string(),
                snapshot.cash.to_string(),
                snapshot.last_updated,
                snapshot.updated_by,
            ],
        )?;
        Ok(())
    }
}

impl AdjustmentStore for SqliteStore<'_> {
    fn append_adjustment(&self, owner: &str, adj: &NewAdjustment) -> Result<BalanceAdjustment> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO balance_adjustments(owner, online_delta, cash_delta, reason,
                previous_online, previous_cash, created_at, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                owner,
                adj.online_delta.to_string(),
                adj.cash_delta.to_string(),
                adj.reason,
                adj.previous_online.to_string(),
                adj.previous_cash.to_string(),
                created_at,
                adj.date,
            ],
        )?;
        Ok(BalanceAdjustment {
            id: self.conn.last_insert_rowid(),
            owner: owner.to_string(),
            online_delta: adj.online_delta,
            cash_delta: adj.cash_delta,
            reason: adj.reason.clone(),
            previous_online: adj.previous_online,
            previous_cash: adj.previous_cash,
            created_at,
            date: adj.date,
        })
    }

    fn recent_adjustments(&self, owner: &str, limit: usize) -> Result<Vec<BalanceAdjustment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner, online_delta, cash_delta, reason, previous_online, previous_cash,
                created_at, date
             FROM balance_adjustments WHERE owner=?1
             ORDER BY created_at DESC, id DESC LIMIT ?2",
        )?;
        let mut rows = stmt.query(params![owner, limit as i64])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            let online_delta: String = r.get(2)?;
            let cash_delta: String = r.get(3)?;
            let previous_online: String = r.get(5)?;
            let previous_cash: String = r.get(6)?;
            out.push(BalanceAdjustment {
                id: r.get(0)?,
                owner: r.get(1)?,
                online_delta: parse_amount(&online_delta, "online adjustment")?,
                cash_delta: parse_amount(&cash_delta, "cash adjustment")?,
                reason: r.get(4)?,
                previous_online: parse_amount(&previous_online, "previous online balance")?,
                previous_cash: parse_amount(&previous_cash, "previous cash balance")?,
                created_at: r.get(7)?,
                date: r.get(8)?,
            });
        }
        Ok(out)
    }
}
