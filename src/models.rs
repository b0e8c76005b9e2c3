// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const BALANCE_ADJUSTMENT_CATEGORY: &str = "Balance Adjustment";

/// Largest accepted amount, delta or balance: 1e12.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Rejects values whose magnitude exceeds [`MAX_AMOUNT`].
pub fn check_magnitude(value: Decimal, what: &str) -> Result<(), Error> {
    if value.abs() > MAX_AMOUNT {
        return Err(Error::validation(format!(
            "{} exceeds the maximum of {}",
            what, MAX_AMOUNT
        )));
    }
    Ok(())
}

pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Food",
    "Transportation",
    "Entertainment",
    "Bills",
    "Shopping",
    "Healthcare",
    "Other",
];

/// Attribution tags written to `BalanceSnapshot::updated_by`.
pub mod updated_by {
    pub const TRANSACTION_ADD: &str = "transaction_add";
    pub const SYNC_TO_TRANSACTIONS: &str = "sync_to_transactions";
    pub const SYNC_TO_CURRENT: &str = "sync_to_current";
    pub const INITIAL_SETUP: &str = "initial_setup";
    pub const SKIPPED_SETUP: &str = "Skipped initial setup";
    pub const RECURRING_EXECUTE: &str = "recurring_execute";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Income,
    Expense,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Income => "income",
            TxType::Expense => "expense",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TxType::Income),
            "expense" => Ok(TxType::Expense),
            other => Err(Error::InvalidData(format!(
                "unknown transaction type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Online,
    Cash,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 2] = [PaymentMethod::Online, PaymentMethod::Cash];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Online => "online",
            PaymentMethod::Cash => "cash",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Online => "Online",
            PaymentMethod::Cash => "Cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "online" => Ok(PaymentMethod::Online),
            "cash" => Ok(PaymentMethod::Cash),
            other => Err(Error::InvalidData(format!(
                "unknown payment method '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    #[serde(rename = "userId")]
    pub owner: String,
    pub r#type: TxType,
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
    pub is_historical: bool,
    pub is_balance_adjustment: bool,
    pub affect_current_balance: bool,
}

impl Transaction {
    /// Contribution to a balance: `+amount` for income, `-amount` for expense.
    pub fn signed_amount(&self) -> Decimal {
        signed(self.r#type, self.amount)
    }
}

pub(crate) fn signed(ty: TxType, amount: Decimal) -> Decimal {
    match ty {
        TxType::Income => amount,
        TxType::Expense => -amount,
    }
}

/// A transaction as submitted, before the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub r#type: TxType,
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub is_historical: bool,
    pub is_balance_adjustment: bool,
    pub affect_current_balance: bool,
}

impl NewTransaction {
    /// An expense dated `date`, classified against `today`.
    ///
    /// Non-historical entries always affect the current balance; historical
    /// ones default to leaving it alone.
    pub fn expense(
        amount: Decimal,
        category: &str,
        date: NaiveDate,
        payment_method: PaymentMethod,
        today: NaiveDate,
    ) -> Self {
        let is_historical = is_historical(date, today);
        NewTransaction {
            r#type: TxType::Expense,
            amount,
            category: category.to_string(),
            description: None,
            date,
            payment_method,
            is_historical,
            is_balance_adjustment: false,
            affect_current_balance: !is_historical,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn signed_amount(&self) -> Decimal {
        signed(self.r#type, self.amount)
    }

    /// Whether recording this entry must move the balance snapshot.
    pub fn moves_snapshot(&self) -> bool {
        !self.is_historical || self.affect_current_balance
    }
}

/// Any date strictly before today is historical.
pub fn is_historical(date: NaiveDate, today: NaiveDate) -> bool {
    date < today
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSnapshot {
    pub online: Decimal,
    pub cash: Decimal,
    pub last_updated: DateTime<Utc>,
    pub updated_by: String,
}

impl BalanceSnapshot {
    pub fn new(online: Decimal, cash: Decimal, updated_by: &str) -> Self {
        BalanceSnapshot {
            online,
            cash,
            last_updated: Utc::now(),
            updated_by: updated_by.to_string(),
        }
    }

    pub fn get(&self, method: PaymentMethod) -> Decimal {
        match method {
            PaymentMethod::Online => self.online,
            PaymentMethod::Cash => self.cash,
        }
    }

    pub fn set(&mut self, method: PaymentMethod, value: Decimal) {
        match method {
            PaymentMethod::Online => self.online = value,
            PaymentMethod::Cash => self.cash = value,
        }
    }

    pub fn total(&self) -> Decimal {
        self.online + self.cash
    }

    /// Copy with `delta` applied to `method` and a fresh attribution.
    pub fn with_delta(&self, method: PaymentMethod, delta: Decimal, updated_by: &str) -> Self {
        let mut next = self.clone();
        next.set(method, self.get(method) + delta);
        next.last_updated = Utc::now();
        next.updated_by = updated_by.to_string();
        next
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceAdjustment {
    pub id: i64,
    #[serde(rename = "userId")]
    pub owner: String,
    #[serde(rename = "onlineAdjustment")]
    pub online_delta: Decimal,
    #[serde(rename = "cashAdjustment")]
    pub cash_delta: Decimal,
    pub reason: String,
    #[serde(rename = "previousOnlineBalance")]
    pub previous_online: Decimal,
    #[serde(rename = "previousCashBalance")]
    pub previous_cash: Decimal,
    pub created_at: DateTime<Utc>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetGoal {
    pub monthly_limit: Decimal,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(Error::InvalidData(format!("unknown frequency '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTemplate {
    pub id: i64,
    #[serde(rename = "userId")]
    pub owner: String,
    pub r#type: TxType,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub payment_method: PaymentMethod,
    pub frequency: Frequency,
    pub next_execution: NaiveDate,
    pub last_executed: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}
