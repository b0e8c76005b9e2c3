// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde_json::json;

use super::{Context, output_flags};
use crate::store::{LedgerStore, TransactionFilter};
use crate::summary::{monthly_expenses, ranked_categories, summarize};
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table};

pub fn handle(ctx: &Context<'_>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(ctx, sub)?,
        Some(("by-category", sub)) => by_category(ctx, sub)?,
        Some(("monthly", sub)) => monthly(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn summary(ctx: &Context<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let s = summarize(ctx.store().query(ctx.owner(), &TransactionFilter::all())?);
    if maybe_print_json(json_flag, jsonl_flag, &s)? {
        return Ok(());
    }
    let rows = vec![
        vec![
            "Online".to_string(),
            fmt_money(&s.online_income),
            fmt_money(&s.online_expenses),
            fmt_money(&s.online_balance),
        ],
        vec![
            "Cash".to_string(),
            fmt_money(&s.cash_income),
            fmt_money(&s.cash_expenses),
            fmt_money(&s.cash_balance),
        ],
        vec![
            "Total".to_string(),
            fmt_money(&s.total_income),
            fmt_money(&s.total_expenses),
            fmt_money(&s.balance),
        ],
    ];
    println!(
        "{}",
        pretty_table(&["Method", "Income", "Expenses", "Net"], rows)
    );
    match (s.date_range.start, s.date_range.end) {
        (Some(start), Some(end)) => {
            println!("{} transactions from {} to {}", s.transaction_count, start, end)
        }
        _ => println!("{} transactions", s.transaction_count),
    }
    if let Some(top) = &s.top_spending_category {
        println!("Top spending category: {} ({})", top.category, fmt_money(&top.amount));
    }
    Ok(())
}

fn by_category(ctx: &Context<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let filter = match sub.get_one::<String>("month") {
        Some(m) => TransactionFilter::month(&parse_month(m)?),
        None => TransactionFilter::all(),
    };
    let txs = ctx.store().query(ctx.owner(), &filter)?;
    let ranked = ranked_categories(&txs);
    let data: Vec<_> = ranked
        .iter()
        .map(|(cat, spent)| json!({ "category": cat, "spent": spent }))
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = ranked
            .iter()
            .map(|(cat, spent)| vec![cat.clone(), fmt_money(spent)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }
    Ok(())
}

fn monthly(ctx: &Context<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);
    let txs = ctx.store().query(ctx.owner(), &TransactionFilter::all())?;
    let totals: Vec<_> = monthly_expenses(&txs).into_iter().take(months).collect();
    let data: Vec<_> = totals
        .iter()
        .map(|(month, spent)| json!({ "month": month, "spent": spent }))
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = totals
            .iter()
            .map(|(month, spent)| vec![month.clone(), fmt_money(spent)])
            .collect();
        println!("{}", pretty_table(&["Month", "Expenses"], rows));
    }
    Ok(())
}
