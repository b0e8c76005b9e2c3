// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rust_decimal::Decimal;
use serde_json::json;

use super::{Context, output_flags, required};
use crate::adjust::{AdjustmentRequest, adjust_balances};
use crate::models::PaymentMethod;
use crate::onboarding;
use crate::reconcile::{self, BalanceStatus};
use crate::store::{AdjustmentStore, SnapshotStore};
use crate::utils::{fmt_delta, fmt_money, maybe_print_json, parse_decimal, pretty_table};

pub fn handle(ctx: &Context<'_>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("setup", sub)) => setup(ctx, sub)?,
        Some(("show", sub)) => show(ctx, sub)?,
        Some(("adjust", sub)) => adjust(ctx, sub)?,
        Some(("history", sub)) => history(ctx, sub)?,
        Some(("sync", sub)) => sync(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn optional_amount(sub: &clap::ArgMatches, id: &str) -> Result<Option<Decimal>> {
    sub.get_one::<String>(id)
        .map(|s| parse_decimal(s))
        .transpose()
}

fn setup(ctx: &Context<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let store = ctx.store();
    let snapshot = if sub.get_flag("skip") {
        onboarding::skip_setup(&store, ctx.owner())?
    } else {
        onboarding::setup_balances(
            &store,
            ctx.owner(),
            optional_amount(sub, "online")?,
            optional_amount(sub, "cash")?,
        )?
    };
    println!(
        "Tracking started: online {}, cash {} (total {})",
        fmt_money(&snapshot.online),
        fmt_money(&snapshot.cash),
        fmt_money(&snapshot.total())
    );
    Ok(())
}

fn show(ctx: &Context<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let store = ctx.store();
    let Some(snapshot) = store.get(ctx.owner())? else {
        println!("Balances are not set up yet. Run `spendwise balance setup`.");
        return Ok(());
    };
    let status = reconcile::current_status(&store, ctx.owner())?;
    let payload = json!({
        "online": snapshot.online,
        "cash": snapshot.cash,
        "total": snapshot.total(),
        "lastUpdated": snapshot.last_updated,
        "updatedBy": snapshot.updated_by,
        "reconciliation": status,
    });
    if maybe_print_json(json_flag, jsonl_flag, &payload)? {
        return Ok(());
    }
    let rows = vec![
        vec!["Online".to_string(), fmt_money(&snapshot.online)],
        vec!["Cash".to_string(), fmt_money(&snapshot.cash)],
        vec!["Total".to_string(), fmt_money(&snapshot.total())],
    ];
    println!("{}", pretty_table(&["Balance", "Amount"], rows));
    println!(
        "Last updated {} by {}",
        snapshot.last_updated.format("%Y-%m-%d %H:%M UTC"),
        snapshot.updated_by
    );
    if let BalanceStatus::Discrepant { .. } = status {
        println!("Balances differ from transaction history. Run `spendwise doctor` for details.");
    }
    Ok(())
}

fn adjust(ctx: &Context<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let req = AdjustmentRequest {
        online: optional_amount(sub, "online")?,
        cash: optional_amount(sub, "cash")?,
        reason: required(sub, "reason")?.to_string(),
    };
    let sink = ctx.sink()?;
    let outcome = adjust_balances(
        &ctx.store(),
        ctx.owner(),
        &req,
        ctx.today,
        &ctx.notifier(sink.as_ref()),
    )?;
    for method in PaymentMethod::ALL {
        println!(
            "{}: {} -> {}",
            method.label(),
            fmt_money(&outcome.before.get(method)),
            fmt_money(&outcome.after.get(method))
        );
    }
    println!(
        "Adjustment recorded ({} ledger entr{}): {}",
        outcome.synthetic.len(),
        if outcome.synthetic.len() == 1 { "y" } else { "ies" },
        outcome.record.reason
    );
    Ok(())
}

fn history(ctx: &Context<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(5);
    let data = ctx.store().recent_adjustments(ctx.owner(), limit)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|a| {
                vec![
                    a.date.to_string(),
                    fmt_delta(&a.online_delta),
                    fmt_delta(&a.cash_delta),
                    a.reason.clone(),
                    fmt_money(&(a.previous_online + a.previous_cash)),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Online", "Cash", "Reason", "Total before"], rows)
        );
    }
    Ok(())
}

fn sync(ctx: &Context<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let store = ctx.store();
    let snapshot = match required(sub, "to")?.as_str() {
        "current" => reconcile::resolve_by_snapshot(&store, ctx.owner())?,
        "transactions" => reconcile::resolve_by_ledger(&store, ctx.owner())?,
        other => bail!("Unknown sync target: {} (use current|transactions)", other),
    };
    println!(
        "Balances now online {}, cash {} ({})",
        fmt_money(&snapshot.online),
        fmt_money(&snapshot.cash),
        snapshot.updated_by
    );
    Ok(())
}
