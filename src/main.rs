// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use spendwise::commands::{self, Context};
use spendwise::{cli, config::Config, db};

fn init_logging(verbose: bool) {
    // RUST_LOG > --verbose > quiet default
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    let conn = db::open_or_init()?;
    let config = Config::load(&conn)?.with_owner(matches.get_one::<String>("owner").map(String::as_str));
    let ctx = Context::new(&conn, config);

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("config", sub)) => commands::config::handle(&ctx, sub)?,
        Some(("balance", sub)) => commands::balance::handle(&ctx, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&ctx, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&ctx, sub)?,
        Some(("recurring", sub)) => commands::recurring::handle(&ctx, sub)?,
        Some(("report", sub)) => commands::reports::handle(&ctx, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&ctx, sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(&ctx, sub)?,
        Some(("alerts", sub)) => commands::alerts::handle(&ctx, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
