// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{BudgetGoal, Transaction, TxType, check_magnitude};
use crate::store::{LedgerStore, SqliteStore, TransactionFilter, parse_amount};

pub fn set_budget(store: &SqliteStore<'_>, owner: &str, monthly_limit: Decimal) -> Result<BudgetGoal> {
    if monthly_limit <= Decimal::ZERO {
        return Err(Error::validation("monthly budget must be greater than zero"));
    }
    check_magnitude(monthly_limit, "monthly budget")?;
    let goal = BudgetGoal {
        monthly_limit,
        updated_at: Utc::now(),
    };
    store.conn().execute(
        "INSERT INTO budgets(owner, monthly_limit, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(owner) DO UPDATE SET monthly_limit=excluded.monthly_limit, updated_at=excluded.updated_at",
        params![owner, goal.monthly_limit.to_string(), goal.updated_at],
    )?;
    Ok(goal)
}

pub fn get_budget(store: &SqliteStore<'_>, owner: &str) -> Result<Option<BudgetGoal>> {
    let raw: Option<(String, DateTime<Utc>)> = store
        .conn()
        .query_row(
            "SELECT monthly_limit, updated_at FROM budgets WHERE owner=?1",
            params![owner],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;
    raw.map(|(limit, updated_at)| {
        Ok(BudgetGoal {
            monthly_limit: parse_amount(&limit, "monthly limit")?,
            updated_at,
        })
    })
    .transpose()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    pub month: String,
    pub monthly_limit: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage: Decimal,
    pub over_budget: bool,
}

/// Every expense dated in `month` counts, historical and adjustments included.
pub fn progress(goal: &BudgetGoal, month: &str, transactions: &[Transaction]) -> BudgetProgress {
    let spent: Decimal = transactions
        .iter()
        .filter(|t| t.r#type == TxType::Expense)
        .filter(|t| t.date.format("%Y-%m").to_string() == month)
        .map(|t| t.amount)
        .sum();
    let percentage = if goal.monthly_limit.is_zero() {
        Decimal::ZERO
    } else {
        (spent / goal.monthly_limit * Decimal::ONE_HUNDRED).round_dp(2)
    };
    BudgetProgress {
        month: month.to_string(),
        monthly_limit: goal.monthly_limit,
        spent,
        remaining: goal.monthly_limit - spent,
        percentage,
        over_budget: spent > goal.monthly_limit,
    }
}

pub fn current_progress(
    store: &SqliteStore<'_>,
    owner: &str,
    month: &str,
) -> Result<Option<BudgetProgress>> {
    let Some(goal) = get_budget(store, owner)? else {
        return Ok(None);
    };
    let txs = store.query(owner, &TransactionFilter::month(month).of_type(TxType::Expense))?;
    Ok(Some(progress(&goal, month, &txs)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentMethod;
    use chrono::NaiveDate;

    fn spend(amount: &str) -> Transaction {
        Transaction {
            id: 1,
            owner: "u".into(),
            r#type: TxType::Expense,
            amount: amount.parse().unwrap(),
            category: "Bills".into(),
            description: None,
            date: NaiveDate::from_ymd_opt(2025, 5, 3).unwrap(),
            payment_method: PaymentMethod::Online,
            created_at: Utc::now(),
            is_historical: false,
            is_balance_adjustment: false,
            affect_current_balance: true,
        }
    }

    #[test]
    fn a_few_paise_over_is_over_budget() {
        let goal = BudgetGoal {
            monthly_limit: Decimal::from(10000),
            updated_at: Utc::now(),
        };
        let p = progress(&goal, "2025-05", &[spend("10000.40")]);
        assert_eq!(p.percentage, "100.00".parse::<Decimal>().unwrap());
        assert_eq!(p.remaining, "-0.40".parse::<Decimal>().unwrap());
        assert!(p.over_budget);

        let exact = progress(&goal, "2025-05", &[spend("10000")]);
        assert!(!exact.over_budget);
    }
}
