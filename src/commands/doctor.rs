// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde_json::json;

use super::{Context, output_flags};
use crate::reconcile::{check_status, compare};
use crate::store::{LedgerStore, SnapshotStore, TransactionFilter};
use crate::utils::{fmt_delta, fmt_money, maybe_print_json, pretty_table};

pub fn handle(ctx: &Context<'_>, m: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(m);
    let store = ctx.store();
    let txs = store.query(ctx.owner(), &TransactionFilter::all())?;
    let snapshot = store.get(ctx.owner())?;
    let rows = compare(&txs, snapshot.as_ref());
    let status = check_status(&txs, snapshot.as_ref());

    let payload = json!({ "status": status, "balances": rows });
    if maybe_print_json(json_flag, jsonl_flag, &payload)? {
        return Ok(());
    }

    if snapshot.is_none() {
        println!("No balance snapshot yet; comparing against zero.");
    }
    let table = rows
        .iter()
        .map(|r| {
            vec![
                r.method.label().to_string(),
                fmt_money(&r.current),
                fmt_money(&r.from_transactions),
                fmt_delta(&r.difference),
                if r.discrepant { "MISMATCH" } else { "ok" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Method", "Current", "From transactions", "Difference", ""], table)
    );
    if status.is_in_sync() {
        println!("✅ doctor: balances match transaction history");
    } else {
        println!(
            "Balances differ. Keep them with `spendwise balance sync --to current` \
             or rebuild from history with `spendwise balance sync --to transactions`."
        );
    }
    Ok(())
}
