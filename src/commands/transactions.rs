// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::{Context, output_flags, required};
use crate::models::{NewTransaction, PaymentMethod, Transaction, TxType, is_historical};
use crate::recorder::{self, RecordOutcome};
use crate::store::{LedgerStore, TransactionFilter};
use crate::utils::{fmt_delta, fmt_money, maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table};

pub fn handle(ctx: &Context<'_>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ctx, sub)?,
        Some(("list", sub)) => list(ctx, sub)?,
        Some(("rm", sub)) => remove(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

/// Turns `tx add` arguments into a submission. Past-dated entries only move
/// the current balance with `--affect-balance`.
pub fn new_transaction(ctx: &Context<'_>, sub: &clap::ArgMatches) -> Result<NewTransaction> {
    let amount = parse_decimal(required(sub, "amount")?)?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => ctx.today,
    };
    let r#type: TxType = required(sub, "type")?.parse()?;
    let payment_method: PaymentMethod = required(sub, "method")?.parse()?;
    let historical = is_historical(date, ctx.today);
    Ok(NewTransaction {
        r#type,
        amount,
        category: required(sub, "category")?.trim().to_string(),
        description: sub
            .get_one::<String>("description")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        date,
        payment_method,
        is_historical: historical,
        is_balance_adjustment: false,
        affect_current_balance: !historical || sub.get_flag("affect_balance"),
    })
}

fn add(ctx: &Context<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let tx = new_transaction(ctx, sub)?;
    let sink = ctx.sink()?;
    let outcome = recorder::record(&ctx.store(), ctx.owner(), &tx, ctx.today, &ctx.notifier(sink.as_ref()))?;
    print_outcome(&outcome);
    Ok(())
}

pub(crate) fn print_outcome(outcome: &RecordOutcome) {
    let t = &outcome.transaction;
    println!(
        "Recorded {} {} ({}, {}) on {} [id {}]",
        t.r#type,
        fmt_money(&t.amount),
        t.category,
        t.payment_method,
        t.date,
        t.id
    );
    match &outcome.balance_change {
        Some(change) => {
            let m = t.payment_method;
            println!(
                "{} balance: {} -> {}",
                m.label(),
                fmt_money(&change.before.get(m)),
                fmt_money(&change.after.get(m))
            );
        }
        None if t.is_historical && !t.affect_current_balance => {
            println!("Historical entry; current balance unchanged");
        }
        None => println!("Balances are not set up yet. Run `spendwise balance setup` to start tracking."),
    }
    for alert in &outcome.alerts {
        println!("Alert raised: {}", alert.kind.subject());
    }
}

pub fn filter_from_args(sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    Ok(TransactionFilter {
        month: sub.get_one::<String>("month").map(|m| parse_month(m)).transpose()?,
        from: sub.get_one::<String>("from").map(|d| parse_date(d)).transpose()?,
        to: sub.get_one::<String>("to").map(|d| parse_date(d)).transpose()?,
        r#type: sub
            .get_one::<String>("type")
            .map(|t| t.parse::<TxType>())
            .transpose()?,
        payment_method: sub
            .get_one::<String>("method")
            .map(|p| p.parse::<PaymentMethod>())
            .transpose()?,
        category: sub.get_one::<String>("category").cloned(),
        limit: sub.get_one::<usize>("limit").copied(),
    })
}

fn list(ctx: &Context<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let data = ctx.store().query(ctx.owner(), &filter_from_args(sub)?)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data.iter().map(row).collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Category", "Description", "Method", "Amount", "Flags"],
                rows,
            )
        );
    }
    Ok(())
}

fn row(t: &Transaction) -> Vec<String> {
    let mut flags = Vec::new();
    if t.is_historical {
        flags.push(if t.affect_current_balance {
            "historical*"
        } else {
            "historical"
        });
    }
    if t.is_balance_adjustment {
        flags.push("adjustment");
    }
    vec![
        t.id.to_string(),
        t.date.to_string(),
        t.r#type.to_string(),
        t.category.clone(),
        t.description.clone().unwrap_or_default(),
        t.payment_method.label().to_string(),
        fmt_delta(&t.signed_amount()),
        flags.join(","),
    ]
}

fn remove(ctx: &Context<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub
        .get_one::<i64>("id")
        .ok_or_else(|| anyhow::anyhow!("transaction id is required"))?;
    recorder::delete(&ctx.store(), ctx.owner(), id)?;
    println!("Deleted transaction {} (current balance unchanged)", id);
    Ok(())
}
