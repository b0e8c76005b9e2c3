// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::Write;
use std::path::Path;

use anyhow::{Context as _, Result, bail};

use super::{Context, required};
use crate::models::Transaction;
use crate::store::{LedgerStore, TransactionFilter};
use crate::summary::summarize;

pub const CSV_HEADER: [&str; 6] = ["Date", "Type", "Category", "Description", "Amount", "Payment Method"];

pub fn handle(ctx: &Context<'_>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(ctx, sub),
        _ => Ok(()),
    }
}

fn export_transactions(ctx: &Context<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = required(sub, "format")?.to_lowercase();
    let out = required(sub, "out")?;
    let count = export_to_path(ctx, &fmt, Path::new(out))?;
    println!("Exported {} transactions to {}", count, out);
    Ok(())
}

/// Writes the owner's ledger to `out`, newest first. Returns the row count.
pub fn export_to_path(ctx: &Context<'_>, fmt: &str, out: &Path) -> Result<usize> {
    let txs = ctx.store().query(ctx.owner(), &TransactionFilter::all())?;
    let count = txs.len();
    match fmt {
        "csv" => {
            let file = std::fs::File::create(out)
                .with_context(|| format!("Create {}", out.display()))?;
            write_csv(&txs, file)?;
        }
        "json" => {
            let s = summarize(txs);
            std::fs::write(out, serde_json::to_string_pretty(&s)?)
                .with_context(|| format!("Write {}", out.display()))?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    tracing::debug!(path = %out.display(), count, fmt, "export written");
    Ok(count)
}

pub fn write_csv<W: Write>(txs: &[Transaction], w: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    wtr.write_record(CSV_HEADER)?;
    for t in txs {
        wtr.write_record([
            t.date.to_string(),
            t.r#type.to_string(),
            t.category.clone(),
            t.description.clone().unwrap_or_default(),
            t.amount.to_string(),
            t.payment_method.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
