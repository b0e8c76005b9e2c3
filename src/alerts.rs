// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Threshold alerts.
//!
//! Balance alerts fire on a falling edge only: the previous total must be at
//! or above a threshold and the current total below it. The daily-expense
//! alert is level-triggered and fires on every check above the limit.

use rust_decimal::Decimal;
use serde_json::{Value, json};

use crate::notify::{NotificationKind, NotificationSink};

pub const LOW_BALANCE_THRESHOLD: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);
pub const CRITICAL_BALANCE_THRESHOLD: Decimal = Decimal::from_parts(500, 0, 0, false, 0);
pub const DAILY_EXPENSE_LIMIT: Decimal = Decimal::from_parts(2000, 0, 0, false, 0);

/// A notification the core decided should be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub kind: NotificationKind,
    pub payload: Value,
}

impl Alert {
    pub fn new(kind: NotificationKind, payload: Value) -> Self {
        Alert { kind, payload }
    }
}

fn crossed_below(previous: Decimal, current: Decimal, threshold: Decimal) -> bool {
    current < threshold && previous >= threshold
}

/// Totals are online + cash.
pub fn check_balance_alert(previous_total: Decimal, current_total: Decimal) -> Vec<Alert> {
    let mut out = Vec::new();
    if crossed_below(previous_total, current_total, LOW_BALANCE_THRESHOLD) {
        out.push(Alert::new(
            NotificationKind::LowBalance,
            json!({ "balance": current_total }),
        ));
    }
    if crossed_below(previous_total, current_total, CRITICAL_BALANCE_THRESHOLD) {
        out.push(Alert::new(
            NotificationKind::CriticalBalance,
            json!({ "balance": current_total }),
        ));
    }
    out
}

pub fn check_daily_expense_alert(today_total: Decimal) -> Option<Alert> {
    if today_total > DAILY_EXPENSE_LIMIT {
        Some(Alert::new(
            NotificationKind::DailyExpense,
            json!({ "totalExpenses": today_total, "limit": DAILY_EXPENSE_LIMIT }),
        ))
    } else {
        None
    }
}

/// Where alerts go, passed explicitly into every operation that can raise one.
pub struct Notifier<'a> {
    pub sink: &'a dyn NotificationSink,
    pub recipient: Option<String>,
}

impl<'a> Notifier<'a> {
    pub fn new(sink: &'a dyn NotificationSink, recipient: Option<String>) -> Self {
        Notifier { sink, recipient }
    }
}

/// Best-effort delivery. Failures are logged and swallowed; returns how many
/// alerts the sink accepted.
pub fn dispatch(notifier: &Notifier<'_>, alerts: &[Alert]) -> usize {
    if alerts.is_empty() {
        return 0;
    }
    let Some(recipient) = notifier.recipient.as_deref() else {
        tracing::warn!(count = alerts.len(), "no alert email configured; skipping delivery");
        return 0;
    };
    let mut delivered = 0;
    for alert in alerts {
        match notifier.sink.send(alert.kind, recipient, &alert.payload) {
            Ok(()) => delivered += 1,
            Err(e) => {
                tracing::warn!(kind = %alert.kind, error = %e, "failed to send email alert")
            }
        }
    }
    delivered
}
