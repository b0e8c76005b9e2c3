// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Recording a transaction and deciding its effect on the current balance.
//!
//! The ledger row is written first. If the snapshot write fails afterwards
//! the row stays; the reconciler reports the resulting drift.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::alerts::{Alert, Notifier, check_balance_alert, check_daily_expense_alert, dispatch};
use crate::error::{Error, Result};
use crate::models::{
    BalanceSnapshot, NewTransaction, Transaction, TxType, check_magnitude, updated_by,
};
use crate::store::{LedgerStore, SnapshotStore, TransactionFilter};

#[derive(Debug, Clone)]
pub struct BalanceChange {
    pub before: BalanceSnapshot,
    pub after: BalanceSnapshot,
}

#[derive(Debug, Clone)]
pub struct RecordOutcome {
    pub transaction: Transaction,
    /// `None` when the snapshot was left alone.
    pub balance_change: Option<BalanceChange>,
    pub today_expenses: Decimal,
    pub alerts: Vec<Alert>,
}

pub fn validate(tx: &NewTransaction) -> Result<()> {
    if tx.amount <= Decimal::ZERO {
        return Err(Error::validation("amount must be greater than zero"));
    }
    check_magnitude(tx.amount, "amount")?;
    if tx.category.trim().is_empty() {
        return Err(Error::validation("category is required"));
    }
    Ok(())
}

pub fn record<S>(
    store: &S,
    owner: &str,
    tx: &NewTransaction,
    today: NaiveDate,
    notifier: &Notifier<'_>,
) -> Result<RecordOutcome>
where
    S: LedgerStore + SnapshotStore,
{
    record_as(store, owner, tx, today, notifier, updated_by::TRANSACTION_ADD)
}

pub(crate) fn record_as<S>(
    store: &S,
    owner: &str,
    tx: &NewTransaction,
    today: NaiveDate,
    notifier: &Notifier<'_>,
    attribution: &str,
) -> Result<RecordOutcome>
where
    S: LedgerStore + SnapshotStore,
{
    validate(tx)?;

    // Today's expenses as they stood before this entry.
    let earlier_today: Decimal = store
        .query(owner, &TransactionFilter::on(today).of_type(TxType::Expense))?
        .iter()
        .map(|t| t.amount)
        .sum();

    let transaction = store.append(owner, tx)?;
    tracing::debug!(owner, id = transaction.id, amount = %tx.amount, "transaction appended");

    let mut alerts = Vec::new();
    let mut balance_change = None;
    if tx.moves_snapshot() {
        match store.get(owner)? {
            Some(before) => {
                let after = before.with_delta(tx.payment_method, tx.signed_amount(), attribution);
                store.put(owner, &after)?;
                alerts.extend(check_balance_alert(before.total(), after.total()));
                balance_change = Some(BalanceChange { before, after });
            }
            None => {
                tracing::warn!(owner, "no balance snapshot yet; current balance not updated");
            }
        }
    }

    let today_expenses = match tx.r#type {
        TxType::Expense => earlier_today + tx.amount,
        TxType::Income => earlier_today,
    };
    alerts.extend(check_daily_expense_alert(today_expenses));

    dispatch(notifier, &alerts);

    Ok(RecordOutcome {
        transaction,
        balance_change,
        today_expenses,
        alerts,
    })
}

/// Removes a ledger row. The snapshot is not touched.
pub fn delete<S: LedgerStore>(store: &S, owner: &str, id: i64) -> Result<()> {
    store.delete(owner, id)?;
    tracing::debug!(owner, id, "transaction deleted");
    Ok(())
}
