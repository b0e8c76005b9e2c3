// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Manual balance corrections with an audit trail.
//!
//! Write order is synthetic ledger rows, then the adjustment record, then the
//! snapshot. Stopping part-way leaves ledger rows the snapshot does not
//! reflect, which the reconciler reports as a discrepancy.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;

use crate::alerts::{Alert, Notifier, check_balance_alert, dispatch};
use crate::error::{Error, Result};
use crate::models::{
    BALANCE_ADJUSTMENT_CATEGORY, BalanceAdjustment, BalanceSnapshot, NewTransaction,
    PaymentMethod, Transaction, TxType, check_magnitude,
};
use crate::notify::NotificationKind;
use crate::store::{AdjustmentStore, LedgerStore, NewAdjustment, SnapshotStore};

#[derive(Debug, Clone)]
pub struct AdjustmentRequest {
    pub online: Option<Decimal>,
    pub cash: Option<Decimal>,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct AdjustmentOutcome {
    pub record: BalanceAdjustment,
    pub synthetic: Vec<Transaction>,
    pub before: BalanceSnapshot,
    pub after: BalanceSnapshot,
    pub alerts: Vec<Alert>,
}

impl AdjustmentRequest {
    fn delta(&self, method: PaymentMethod) -> Decimal {
        let raw = match method {
            PaymentMethod::Online => self.online,
            PaymentMethod::Cash => self.cash,
        };
        raw.unwrap_or(Decimal::ZERO)
    }

    pub fn validate(&self) -> Result<()> {
        if self.delta(PaymentMethod::Online).is_zero() && self.delta(PaymentMethod::Cash).is_zero()
        {
            return Err(Error::validation(
                "enter at least one non-zero adjustment amount",
            ));
        }
        check_magnitude(self.delta(PaymentMethod::Online), "online adjustment")?;
        check_magnitude(self.delta(PaymentMethod::Cash), "cash adjustment")?;
        if self.reason.trim().is_empty() {
            return Err(Error::validation("a reason for the adjustment is required"));
        }
        Ok(())
    }
}

/// Ledger entry mirroring one non-zero delta.
pub fn synthetic_transaction(
    method: PaymentMethod,
    delta: Decimal,
    reason: &str,
    today: NaiveDate,
) -> NewTransaction {
    NewTransaction {
        r#type: if delta > Decimal::ZERO {
            TxType::Income
        } else {
            TxType::Expense
        },
        amount: delta.abs(),
        category: BALANCE_ADJUSTMENT_CATEGORY.to_string(),
        description: Some(format!("{} balance adjustment: {}", method.label(), reason)),
        date: today,
        payment_method: method,
        is_historical: false,
        is_balance_adjustment: true,
        affect_current_balance: true,
    }
}

pub fn adjust_balances<S>(
    store: &S,
    owner: &str,
    req: &AdjustmentRequest,
    today: NaiveDate,
    notifier: &Notifier<'_>,
) -> Result<AdjustmentOutcome>
where
    S: LedgerStore + SnapshotStore + AdjustmentStore,
{
    req.validate()?;
    let reason = req.reason.trim();

    let before = store
        .get(owner)?
        .unwrap_or_else(|| BalanceSnapshot::new(Decimal::ZERO, Decimal::ZERO, reason));

    let mut synthetic = Vec::new();
    for method in PaymentMethod::ALL {
        let delta = req.delta(method);
        if !delta.is_zero() {
            synthetic.push(store.append(owner, &synthetic_transaction(method, delta, reason, today))?);
        }
    }

    let record = store.append_adjustment(
        owner,
        &NewAdjustment {
            online_delta: req.delta(PaymentMethod::Online),
            cash_delta: req.delta(PaymentMethod::Cash),
            reason: reason.to_string(),
            previous_online: before.online,
            previous_cash: before.cash,
            date: today,
        },
    )?;

    let mut after = before.clone();
    for method in PaymentMethod::ALL {
        after = after.with_delta(method, req.delta(method), reason);
    }
    store.put(owner, &after)?;
    tracing::info!(
        owner,
        online = %record.online_delta,
        cash = %record.cash_delta,
        "balances adjusted"
    );

    let mut alerts = check_balance_alert(before.total(), after.total());
    alerts.push(Alert::new(
        NotificationKind::BalanceAdjustment,
        json!({
            "onlineAdjustment": record.online_delta,
            "cashAdjustment": record.cash_delta,
            "reason": record.reason,
            "onlineBalance": after.online,
            "cashBalance": after.cash,
        }),
    ));
    dispatch(notifier, &alerts);

    Ok(AdjustmentOutcome {
        record,
        synthetic,
        before,
        after,
        alerts,
    })
}
