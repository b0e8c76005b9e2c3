// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::{Context, output_flags, required};
use crate::budget;
use crate::utils::{current_month, fmt_money, maybe_print_json, parse_decimal, parse_month, pretty_table};

pub fn handle(ctx: &Context<'_>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(ctx, sub)?,
        Some(("show", sub)) => show(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(ctx: &Context<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(required(sub, "amount")?)?;
    let goal = budget::set_budget(&ctx.store(), ctx.owner(), amount)?;
    println!("Monthly budget set to {}", fmt_money(&goal.monthly_limit));
    Ok(())
}

fn show(ctx: &Context<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let month = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m)?,
        None => current_month(ctx.today),
    };
    let Some(p) = budget::current_progress(&ctx.store(), ctx.owner(), &month)? else {
        println!("No budget set. Use `spendwise budget set <amount>`.");
        return Ok(());
    };
    if !maybe_print_json(json_flag, jsonl_flag, &p)? {
        let rows = vec![vec![
            p.month.clone(),
            fmt_money(&p.monthly_limit),
            fmt_money(&p.spent),
            fmt_money(&p.remaining),
            format!("{}%", p.percentage),
        ]];
        println!(
            "{}",
            pretty_table(&["Month", "Budget", "Spent", "Remaining", "Used"], rows)
        );
        if p.over_budget {
            println!("Over budget by {}", fmt_money(&(p.spent - p.monthly_limit)));
        }
    }
    Ok(())
}
