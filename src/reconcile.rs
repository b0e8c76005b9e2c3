// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ledger-vs-snapshot reconciliation.
//!
//! The ledger-derived balance counts every transaction of a payment method,
//! historical backfill included, so backfilled history shows up as a
//! discrepancy instead of being hidden.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{BalanceSnapshot, PaymentMethod, Transaction, updated_by};
use crate::store::{LedgerStore, SnapshotStore, TransactionFilter};

/// Absolute tolerance for rounding noise; a difference must exceed it.
pub const DISCREPANCY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

pub fn ledger_balance(transactions: &[Transaction], method: PaymentMethod) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.payment_method == method)
        .map(Transaction::signed_amount)
        .sum()
}

pub fn snapshot_balance(snapshot: Option<&BalanceSnapshot>, method: PaymentMethod) -> Decimal {
    snapshot.map(|s| s.get(method)).unwrap_or(Decimal::ZERO)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BalanceStatus {
    InSync,
    /// Deltas are snapshot minus ledger, per method.
    Discrepant {
        online_delta: Decimal,
        cash_delta: Decimal,
    },
}

impl BalanceStatus {
    pub fn is_in_sync(&self) -> bool {
        matches!(self, BalanceStatus::InSync)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceComparison {
    pub method: PaymentMethod,
    pub current: Decimal,
    pub from_transactions: Decimal,
    pub difference: Decimal,
    pub discrepant: bool,
}

pub fn compare(
    transactions: &[Transaction],
    snapshot: Option<&BalanceSnapshot>,
) -> Vec<BalanceComparison> {
    PaymentMethod::ALL
        .iter()
        .map(|&method| {
            let current = snapshot_balance(snapshot, method);
            let from_transactions = ledger_balance(transactions, method);
            let difference = current - from_transactions;
            BalanceComparison {
                method,
                current,
                from_transactions,
                difference,
                discrepant: difference.abs() > DISCREPANCY_TOLERANCE,
            }
        })
        .collect()
}

pub fn check_status(
    transactions: &[Transaction],
    snapshot: Option<&BalanceSnapshot>,
) -> BalanceStatus {
    let rows = compare(transactions, snapshot);
    if rows.iter().any(|r| r.discrepant) {
        let delta = |m: PaymentMethod| {
            rows.iter()
                .find(|r| r.method == m)
                .map(|r| r.difference)
                .unwrap_or(Decimal::ZERO)
        };
        BalanceStatus::Discrepant {
            online_delta: delta(PaymentMethod::Online),
            cash_delta: delta(PaymentMethod::Cash),
        }
    } else {
        BalanceStatus::InSync
    }
}

/// Loads both sides from the stores and classifies them.
pub fn current_status<S>(store: &S, owner: &str) -> Result<BalanceStatus>
where
    S: LedgerStore + SnapshotStore,
{
    let transactions = store.query(owner, &TransactionFilter::all())?;
    let snapshot = store.get(owner)?;
    Ok(check_status(&transactions, snapshot.as_ref()))
}

/// "Keep current balance": re-stamps the snapshot without changing values.
pub fn resolve_by_snapshot<S: SnapshotStore>(store: &S, owner: &str) -> Result<BalanceSnapshot> {
    let current = store
        .get(owner)?
        .ok_or_else(|| Error::NotFound(format!("balance snapshot for '{}'", owner)))?;
    let acknowledged = BalanceSnapshot::new(current.online, current.cash, updated_by::SYNC_TO_CURRENT);
    store.put(owner, &acknowledged)?;
    tracing::info!(owner, "snapshot acknowledged as current");
    Ok(acknowledged)
}

/// "Use transaction balance": overwrites the snapshot with ledger-derived values.
pub fn resolve_by_ledger<S>(store: &S, owner: &str) -> Result<BalanceSnapshot>
where
    S: LedgerStore + SnapshotStore,
{
    let transactions = store.query(owner, &TransactionFilter::all())?;
    let synced = BalanceSnapshot::new(
        ledger_balance(&transactions, PaymentMethod::Online),
        ledger_balance(&transactions, PaymentMethod::Cash),
        updated_by::SYNC_TO_TRANSACTIONS,
    );
    store.put(owner, &synced)?;
    tracing::info!(owner, online = %synced.online, cash = %synced.cash, "snapshot synced to ledger");
    Ok(synced)
}
