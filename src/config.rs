// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Profile settings kept in the `settings` table, plus secrets from the
//! environment.

use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::notify::{
    DEFAULT_MAIL_FROM, LogSink, MailQueueSink, NotificationSink, NotifierKind, ResendSink,
    is_valid_email,
};

pub const RESEND_KEY_ENV: &str = "RESEND_API_KEY";
pub const DEFAULT_OWNER: &str = "local";

pub const KEYS: &[&str] = &["owner", "email", "notifier", "mail_from"];

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let value = value.trim();
    match key {
        "owner" | "mail_from" if value.is_empty() => {
            return Err(Error::validation(format!("{} cannot be empty", key)));
        }
        "email" if !is_valid_email(value) => {
            return Err(Error::validation(format!("invalid email address '{}'", value)));
        }
        "notifier" => {
            value.parse::<NotifierKind>()?;
        }
        k if !KEYS.contains(&k) => {
            return Err(Error::validation(format!(
                "unknown setting '{}' (use {})",
                k,
                KEYS.join("|")
            )));
        }
        _ => {}
    }
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub owner: String,
    pub email: Option<String>,
    pub notifier: &'static str,
    pub mail_from: String,
    #[serde(skip)]
    pub notifier_kind: NotifierKind,
    #[serde(skip)]
    pub resend_api_key: Option<String>,
}

impl Config {
    pub fn load(conn: &Connection) -> Result<Config> {
        let notifier_kind = match get_setting(conn, "notifier")? {
            Some(v) => v.parse()?,
            None => NotifierKind::default(),
        };
        let resend_api_key = std::env::var(RESEND_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty());
        Ok(Config {
            owner: get_setting(conn, "owner")?.unwrap_or_else(|| DEFAULT_OWNER.to_string()),
            email: get_setting(conn, "email")?,
            notifier: notifier_kind.as_str(),
            mail_from: get_setting(conn, "mail_from")?
                .unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
            notifier_kind,
            resend_api_key,
        })
    }

    /// A per-invocation owner override wins over the stored profile.
    pub fn with_owner(mut self, owner: Option<&str>) -> Self {
        if let Some(o) = owner.map(str::trim).filter(|o| !o.is_empty()) {
            self.owner = o.to_string();
        }
        self
    }

    pub fn sink<'c>(&self, conn: &'c Connection) -> Result<Box<dyn NotificationSink + 'c>> {
        match self.notifier_kind {
            NotifierKind::Log => Ok(Box::new(LogSink)),
            NotifierKind::Queue => Ok(Box::new(MailQueueSink::new(conn))),
            NotifierKind::Resend => match &self.resend_api_key {
                Some(key) => Ok(Box::new(ResendSink::new(key, &self.mail_from)?)),
                None => {
                    tracing::warn!("{} is not set; alerts will only be logged", RESEND_KEY_ENV);
                    Ok(Box::new(LogSink))
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn defaults_without_settings() {
        let conn = conn();
        let cfg = Config::load(&conn).unwrap();
        assert_eq!(cfg.owner, "local");
        assert!(cfg.email.is_none());
        assert_eq!(cfg.notifier_kind, NotifierKind::Log);
        assert_eq!(cfg.with_owner(Some(" alice ")).owner, "alice");
    }

    #[test]
    fn set_rejects_bad_values() {
        let conn = conn();
        assert!(set_setting(&conn, "email", "nope").unwrap_err().is_validation());
        assert!(set_setting(&conn, "notifier", "smtp").is_err());
        assert!(set_setting(&conn, "colour", "blue").unwrap_err().is_validation());

        set_setting(&conn, "email", "me@example.com").unwrap();
        set_setting(&conn, "notifier", "queue").unwrap();
        let cfg = Config::load(&conn).unwrap();
        assert_eq!(cfg.email.as_deref(), Some("me@example.com"));
        assert_eq!(cfg.notifier_kind, NotifierKind::Queue);
    }
}
