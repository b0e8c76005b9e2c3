// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Outbound notification sinks.
//!
//! The core only hands a `(kind, recipient, payload)` triple to a sink; how
//! the mail leaves the machine is the sink's business. Three sinks exist:
//! the Resend HTTP API, a `mail_queue` table drained by an external sender,
//! and a log-only sink for when no delivery is configured.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{Connection, params};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::utils::http_client;

pub const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";
pub const DEFAULT_MAIL_FROM: &str = "SpendWise <onboarding@resend.dev>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    LowBalance,
    CriticalBalance,
    DailyExpense,
    BalanceAdjustment,
    Test,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::LowBalance => "low_balance",
            NotificationKind::CriticalBalance => "critical_balance",
            NotificationKind::DailyExpense => "daily_expense",
            NotificationKind::BalanceAdjustment => "balance_adjustment",
            NotificationKind::Test => "test",
        }
    }

    pub fn subject(&self) -> &'static str {
        match self {
            NotificationKind::LowBalance => "Low Balance Alert - SpendWise",
            NotificationKind::CriticalBalance => "Critical Balance Alert - SpendWise",
            NotificationKind::DailyExpense => "Daily Expense Alert - SpendWise",
            NotificationKind::BalanceAdjustment => "Balance Adjustment Confirmation - SpendWise",
            NotificationKind::Test => "Test Email - SpendWise",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait NotificationSink {
    fn send(&self, kind: NotificationKind, recipient: &str, payload: &Value) -> Result<()>;
}

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email regex"));

pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s.trim())
}

fn field(payload: &Value, key: &str) -> String {
    match payload.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(v) if !v.is_null() => v.to_string(),
        _ => "?".to_string(),
    }
}

/// Plain-text body for a notification.
pub fn render_text(kind: NotificationKind, payload: &Value) -> String {
    match kind {
        NotificationKind::LowBalance => format!(
            "Your total balance has dropped to ₹{}. Review your recent expenses.",
            field(payload, "balance")
        ),
        NotificationKind::CriticalBalance => format!(
            "Your total balance is critically low at ₹{}. Immediate action is recommended.",
            field(payload, "balance")
        ),
        NotificationKind::DailyExpense => format!(
            "Today's expenses have reached ₹{}, above your daily limit of ₹{}.",
            field(payload, "totalExpenses"),
            field(payload, "limit")
        ),
        NotificationKind::BalanceAdjustment => format!(
            "Your balances were adjusted (online {}, cash {}). Reason: {}",
            field(payload, "onlineAdjustment"),
            field(payload, "cashAdjustment"),
            field(payload, "reason")
        ),
        NotificationKind::Test => {
            "This is a test email from SpendWise. Alerts are configured correctly.".to_string()
        }
    }
}

/// Writes nothing anywhere except the log.
pub struct LogSink;

impl NotificationSink for LogSink {
    fn send(&self, kind: NotificationKind, recipient: &str, payload: &Value) -> Result<()> {
        tracing::info!(kind = %kind, recipient, %payload, "notification (log only)");
        Ok(())
    }
}

/// Queues mail as rows in `mail_queue` for an external sender.
pub struct MailQueueSink<'c> {
    conn: &'c Connection,
}

impl<'c> MailQueueSink<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        MailQueueSink { conn }
    }
}

impl NotificationSink for MailQueueSink<'_> {
    fn send(&self, kind: NotificationKind, recipient: &str, payload: &Value) -> Result<()> {
        let body = json!({ "data": payload, "text": render_text(kind, payload) });
        self.conn.execute(
            "INSERT INTO mail_queue(kind, recipient, subject, payload) VALUES (?1, ?2, ?3, ?4)",
            params![kind.as_str(), recipient, kind.subject(), body.to_string()],
        )?;
        tracing::info!(kind = %kind, recipient, "email alert queued");
        Ok(())
    }
}

pub struct ResendSink {
    client: reqwest::blocking::Client,
    api_key: String,
    from: String,
    endpoint: String,
}

impl ResendSink {
    pub fn new(api_key: &str, from: &str) -> Result<Self> {
        Ok(ResendSink {
            client: http_client()?,
            api_key: api_key.to_string(),
            from: from.to_string(),
            endpoint: RESEND_ENDPOINT.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }
}

impl NotificationSink for ResendSink {
    fn send(&self, kind: NotificationKind, recipient: &str, payload: &Value) -> Result<()> {
        let body = json!({
            "from": self.from,
            "to": [recipient],
            "subject": kind.subject(),
            "text": render_text(kind, payload),
        });
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().unwrap_or_default();
            return Err(Error::Notification(format!("{}: {}", status, detail)));
        }
        tracing::info!(kind = %kind, recipient, "email alert sent");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifierKind {
    #[default]
    Log,
    Queue,
    Resend,
}

impl NotifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifierKind::Log => "log",
            NotifierKind::Queue => "queue",
            NotifierKind::Resend => "resend",
        }
    }
}

impl FromStr for NotifierKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "log" => Ok(NotifierKind::Log),
            "queue" => Ok(NotifierKind::Queue),
            "resend" => Ok(NotifierKind::Resend),
            other => Err(Error::InvalidData(format!(
                "unknown notifier '{}' (use log|queue|resend)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("me@example.com"));
        assert!(is_valid_email(" me@example.co.in "));
        assert!(!is_valid_email("me@example"));
        assert!(!is_valid_email("not an email"));
    }

    #[test]
    fn queue_sink_stores_subject_and_payload() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let sink = MailQueueSink::new(&conn);
        sink.send(
            NotificationKind::LowBalance,
            "me@example.com",
            &json!({ "balance": "950" }),
        )
        .unwrap();
        let (kind, subject, payload): (String, String, String) = conn
            .query_row("SELECT kind, subject, payload FROM mail_queue", [], |r| {
                Ok((r.get(0)?, r.get(1)?, r.get(2)?))
            })
            .unwrap();
        assert_eq!(kind, "low_balance");
        assert_eq!(subject, "Low Balance Alert - SpendWise");
        let v: Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(v["data"]["balance"], "950");
        assert!(v["text"].as_str().unwrap().contains("₹950"));
    }
}
