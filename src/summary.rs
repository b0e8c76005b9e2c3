// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Totals handed to reports and exporters.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{PaymentMethod, Transaction, TxType};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub transactions: Vec<Transaction>,
    pub transaction_count: usize,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub expenses_by_category: BTreeMap<String, Decimal>,
    pub online_balance: Decimal,
    pub cash_balance: Decimal,
    pub online_income: Decimal,
    pub online_expenses: Decimal,
    pub cash_income: Decimal,
    pub cash_expenses: Decimal,
    pub top_spending_category: Option<CategoryTotal>,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

/// Earliest and latest transaction dates; both `None` for an empty ledger.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

fn total(txs: &[Transaction], ty: TxType, method: Option<PaymentMethod>) -> Decimal {
    txs.iter()
        .filter(|t| t.r#type == ty)
        .filter(|t| method.is_none_or(|m| t.payment_method == m))
        .map(|t| t.amount)
        .sum()
}

pub fn expenses_by_category(txs: &[Transaction]) -> BTreeMap<String, Decimal> {
    let mut out = BTreeMap::new();
    for t in txs.iter().filter(|t| t.r#type == TxType::Expense) {
        *out.entry(t.category.clone()).or_insert(Decimal::ZERO) += t.amount;
    }
    out
}

/// Category totals, largest first; ties by name.
pub fn ranked_categories(txs: &[Transaction]) -> Vec<(String, Decimal)> {
    let mut items: Vec<_> = expenses_by_category(txs).into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    items
}

/// Expense totals per `YYYY-MM`, most recent month first.
pub fn monthly_expenses(txs: &[Transaction]) -> Vec<(String, Decimal)> {
    let mut map: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in txs.iter().filter(|t| t.r#type == TxType::Expense) {
        *map.entry(t.date.format("%Y-%m").to_string())
            .or_insert(Decimal::ZERO) += t.amount;
    }
    map.into_iter().rev().collect()
}

/// Method balances are ledger-derived (income minus expenses).
pub fn summarize(transactions: Vec<Transaction>) -> Summary {
    let total_income = total(&transactions, TxType::Income, None);
    let total_expenses = total(&transactions, TxType::Expense, None);
    let online_income = total(&transactions, TxType::Income, Some(PaymentMethod::Online));
    let online_expenses = total(&transactions, TxType::Expense, Some(PaymentMethod::Online));
    let cash_income = total(&transactions, TxType::Income, Some(PaymentMethod::Cash));
    let cash_expenses = total(&transactions, TxType::Expense, Some(PaymentMethod::Cash));
    let top_spending_category = ranked_categories(&transactions)
        .into_iter()
        .next()
        .map(|(category, amount)| CategoryTotal { category, amount });
    let date_range = DateRange {
        start: transactions.iter().map(|t| t.date).min(),
        end: transactions.iter().map(|t| t.date).max(),
    };
    Summary {
        expenses_by_category: expenses_by_category(&transactions),
        transaction_count: transactions.len(),
        top_spending_category,
        date_range,
        transactions,
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
        online_balance: online_income - online_expenses,
        cash_balance: cash_income - cash_expenses,
        online_income,
        online_expenses,
        cash_income,
        cash_expenses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tx(ty: TxType, amount: i64, cat: &str, date: &str, method: PaymentMethod) -> Transaction {
        Transaction {
            id: 0,
            owner: "u".into(),
            r#type: ty,
            amount: Decimal::from(amount),
            category: cat.into(),
            description: None,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            payment_method: method,
            created_at: Utc::now(),
            is_historical: false,
            is_balance_adjustment: false,
            affect_current_balance: true,
        }
    }

    #[test]
    fn summary_splits_by_method() {
        let s = summarize(vec![
            tx(TxType::Income, 500, "Balance Adjustment", "2025-04-01", PaymentMethod::Online),
            tx(TxType::Expense, 120, "Food", "2025-04-02", PaymentMethod::Online),
            tx(TxType::Expense, 30, "Food", "2025-04-03", PaymentMethod::Cash),
            tx(TxType::Expense, 70, "Bills", "2025-03-30", PaymentMethod::Cash),
        ]);
        assert_eq!(s.total_income, Decimal::from(500));
        assert_eq!(s.total_expenses, Decimal::from(220));
        assert_eq!(s.balance, Decimal::from(280));
        assert_eq!(s.online_balance, Decimal::from(380));
        assert_eq!(s.cash_balance, Decimal::from(-100));
        assert_eq!(s.expenses_by_category["Food"], Decimal::from(150));
        assert!(!s.expenses_by_category.contains_key("Balance Adjustment"));
        assert_eq!(s.transaction_count, 4);
        assert_eq!(
            s.top_spending_category,
            Some(CategoryTotal {
                category: "Food".into(),
                amount: Decimal::from(150),
            })
        );
        assert_eq!(s.date_range.start, NaiveDate::from_ymd_opt(2025, 3, 30));
        assert_eq!(s.date_range.end, NaiveDate::from_ymd_opt(2025, 4, 3));

        let empty = summarize(Vec::new());
        assert_eq!(empty.top_spending_category, None);
        assert_eq!(empty.date_range, DateRange::default());

        let months = monthly_expenses(&s.transactions);
        assert_eq!(months[0], ("2025-04".to_string(), Decimal::from(150)));
        assert_eq!(months[1], ("2025-03".to_string(), Decimal::from(70)));
    }

    #[test]
    fn categories_rank_descending() {
        let txs = vec![
            tx(TxType::Expense, 10, "Bills", "2025-04-01", PaymentMethod::Cash),
            tx(TxType::Expense, 40, "Food", "2025-04-01", PaymentMethod::Cash),
            tx(TxType::Expense, 10, "Shopping", "2025-04-01", PaymentMethod::Cash),
        ];
        let ranked = ranked_categories(&txs);
        assert_eq!(ranked[0].0, "Food");
        assert_eq!(ranked[1].0, "Bills");
        assert_eq!(ranked[2].0, "Shopping");
    }
}
