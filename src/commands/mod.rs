// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod alerts;
pub mod balance;
pub mod budgets;
pub mod config;
pub mod doctor;
pub mod exporter;
pub mod recurring;
pub mod reports;
pub mod transactions;

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::alerts::Notifier;
use crate::config::Config;
use crate::notify::NotificationSink;
use crate::store::SqliteStore;

/// What every handler needs: the database, the resolved profile and the
/// calendar day the invocation runs on.
pub struct Context<'c> {
    pub conn: &'c Connection,
    pub config: Config,
    pub today: NaiveDate,
}

impl<'c> Context<'c> {
    pub fn new(conn: &'c Connection, config: Config) -> Self {
        Context {
            conn,
            config,
            today: crate::utils::today(),
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn owner(&self) -> &str {
        &self.config.owner
    }

    pub fn store(&self) -> SqliteStore<'c> {
        SqliteStore::new(self.conn)
    }

    pub fn sink(&self) -> Result<Box<dyn NotificationSink + 'c>> {
        Ok(self.config.sink(self.conn)?)
    }

    pub fn notifier<'s>(&self, sink: &'s dyn NotificationSink) -> Notifier<'s> {
        Notifier::new(sink, self.config.email.clone())
    }
}

pub(crate) fn required<'a>(m: &'a clap::ArgMatches, id: &str) -> Result<&'a String> {
    m.get_one::<String>(id)
        .with_context(|| format!("--{} is required", id))
}

pub(crate) fn output_flags(m: &clap::ArgMatches) -> (bool, bool) {
    (m.get_flag("json"), m.get_flag("jsonl"))
}
