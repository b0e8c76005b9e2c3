// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Recurring transaction templates and "execute now".

use chrono::{Days, Months, NaiveDate, Utc};
use rusqlite::params;
use rust_decimal::Decimal;

use crate::alerts::Notifier;
use crate::error::{Error, Result};
use crate::models::{
    Frequency, NewTransaction, PaymentMethod, RecurringTemplate, TxType, check_magnitude, updated_by,
};
use crate::recorder::{RecordOutcome, record_as};
use crate::store::{SqliteStore, parse_amount};

#[derive(Debug, Clone)]
pub struct NewTemplate {
    pub r#type: TxType,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub payment_method: PaymentMethod,
    pub frequency: Frequency,
}

/// Month and year steps clamp to the last day of a shorter month.
pub fn next_execution_date(frequency: Frequency, from: NaiveDate) -> NaiveDate {
    let next = match frequency {
        Frequency::Weekly => from.checked_add_days(Days::new(7)),
        Frequency::Monthly => from.checked_add_months(Months::new(1)),
        Frequency::Yearly => from.checked_add_months(Months::new(12)),
    };
    next.unwrap_or(NaiveDate::MAX)
}

pub fn add_template(
    store: &SqliteStore<'_>,
    owner: &str,
    t: &NewTemplate,
    today: NaiveDate,
) -> Result<RecurringTemplate> {
    if t.amount <= Decimal::ZERO {
        return Err(Error::validation("amount must be greater than zero"));
    }
    check_magnitude(t.amount, "amount")?;
    if t.category.trim().is_empty() {
        return Err(Error::validation("category is required"));
    }
    let created_at = Utc::now();
    let next_execution = next_execution_date(t.frequency, today);
    store.conn().execute(
        "INSERT INTO recurring(owner, type, amount, category, description, payment_method,
            frequency, next_execution, last_executed, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, NULL, ?9)",
        params![
            owner,
            t.r#type.as_str(),
            t.amount.to_string(),
            t.category,
            t.description,
            t.payment_method.as_str(),
            t.frequency.as_str(),
            next_execution,
            created_at,
        ],
    )?;
    Ok(RecurringTemplate {
        id: store.conn().last_insert_rowid(),
        owner: owner.to_string(),
        r#type: t.r#type,
        amount: t.amount,
        category: t.category.clone(),
        description: t.description.clone(),
        payment_method: t.payment_method,
        frequency: t.frequency,
        next_execution,
        last_executed: None,
        created_at,
    })
}

pub fn list_templates(store: &SqliteStore<'_>, owner: &str) -> Result<Vec<RecurringTemplate>> {
    let mut stmt = store.conn().prepare(
        "SELECT id, owner, type, amount, category, description, payment_method, frequency,
            next_execution, last_executed, created_at
         FROM recurring WHERE owner=?1 ORDER BY next_execution, id",
    )?;
    let mut rows = stmt.query(params![owner])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let ty: String = r.get(2)?;
        let amount: String = r.get(3)?;
        let method: String = r.get(6)?;
        let freq: String = r.get(7)?;
        out.push(RecurringTemplate {
            id: r.get(0)?,
            owner: r.get(1)?,
            r#type: ty.parse()?,
            amount: parse_amount(&amount, "amount")?,
            category: r.get(4)?,
            description: r.get(5)?,
            payment_method: method.parse()?,
            frequency: freq.parse()?,
            next_execution: r.get(8)?,
            last_executed: r.get(9)?,
            created_at: r.get(10)?,
        });
    }
    Ok(out)
}

pub fn get_template(store: &SqliteStore<'_>, owner: &str, id: i64) -> Result<RecurringTemplate> {
    list_templates(store, owner)?
        .into_iter()
        .find(|t| t.id == id)
        .ok_or_else(|| Error::NotFound(format!("recurring transaction {}", id)))
}

pub fn delete_template(store: &SqliteStore<'_>, owner: &str, id: i64) -> Result<()> {
    let n = store.conn().execute(
        "DELETE FROM recurring WHERE id=?1 AND owner=?2",
        params![id, owner],
    )?;
    if n == 0 {
        return Err(Error::NotFound(format!("recurring transaction {}", id)));
    }
    Ok(())
}

/// The transaction a template materialises into on `today`.
pub fn materialize(t: &RecurringTemplate, today: NaiveDate) -> NewTransaction {
    let description = if t.description.trim().is_empty() {
        "(Recurring)".to_string()
    } else {
        format!("{} (Recurring)", t.description.trim())
    };
    NewTransaction {
        r#type: t.r#type,
        amount: t.amount,
        category: t.category.clone(),
        description: Some(description),
        date: today,
        payment_method: t.payment_method,
        is_historical: false,
        is_balance_adjustment: false,
        affect_current_balance: true,
    }
}

/// Records the template as a normal transaction dated today and moves the
/// schedule forward.
pub fn execute_now(
    store: &SqliteStore<'_>,
    owner: &str,
    id: i64,
    today: NaiveDate,
    notifier: &Notifier<'_>,
) -> Result<RecordOutcome> {
    let template = get_template(store, owner, id)?;
    let outcome = record_as(
        store,
        owner,
        &materialize(&template, today),
        today,
        notifier,
        updated_by::RECURRING_EXECUTE,
    )?;
    store.conn().execute(
        "UPDATE recurring SET last_executed=?1, next_execution=?2 WHERE id=?3 AND owner=?4",
        params![today, next_execution_date(template.frequency, today), id, owner],
    )?;
    Ok(outcome)
}
