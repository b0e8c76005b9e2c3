// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};

use super::transactions::print_outcome;
use super::{Context, output_flags, required};
use crate::recurring::{self, NewTemplate};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};

pub fn handle(ctx: &Context<'_>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ctx, sub)?,
        Some(("list", sub)) => list(ctx, sub)?,
        Some(("rm", sub)) => remove(ctx, sub)?,
        Some(("run", sub)) => run(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn id_arg(sub: &clap::ArgMatches) -> Result<i64> {
    sub.get_one::<i64>("id")
        .copied()
        .ok_or_else(|| anyhow!("recurring id is required"))
}

fn add(ctx: &Context<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let t = NewTemplate {
        r#type: required(sub, "type")?.parse()?,
        amount: parse_decimal(required(sub, "amount")?)?,
        category: required(sub, "category")?.trim().to_string(),
        description: required(sub, "description")?.trim().to_string(),
        payment_method: required(sub, "method")?.parse()?,
        frequency: required(sub, "frequency")?.parse()?,
    };
    let created = recurring::add_template(&ctx.store(), ctx.owner(), &t, ctx.today)?;
    println!(
        "Added recurring {} {} ({}) [id {}], next on {}",
        created.frequency,
        created.r#type,
        fmt_money(&created.amount),
        created.id,
        created.next_execution
    );
    Ok(())
}

fn list(ctx: &Context<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let data = recurring::list_templates(&ctx.store(), ctx.owner())?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.r#type.to_string(),
                    fmt_money(&t.amount),
                    t.category.clone(),
                    t.description.clone(),
                    t.payment_method.label().to_string(),
                    t.frequency.to_string(),
                    t.next_execution.to_string(),
                    t.last_executed.map(|d| d.to_string()).unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Type", "Amount", "Category", "Description", "Method", "Every", "Next", "Last"],
                rows,
            )
        );
    }
    Ok(())
}

fn remove(ctx: &Context<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let id = id_arg(sub)?;
    recurring::delete_template(&ctx.store(), ctx.owner(), id)?;
    println!("Deleted recurring transaction {}", id);
    Ok(())
}

fn run(ctx: &Context<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let id = id_arg(sub)?;
    let sink = ctx.sink()?;
    let outcome = recurring::execute_now(
        &ctx.store(),
        ctx.owner(),
        id,
        ctx.today,
        &ctx.notifier(sink.as_ref()),
    )?;
    print_outcome(&outcome);
    Ok(())
}
