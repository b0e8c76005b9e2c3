// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use serde_json::json;

use super::Context;
use crate::alerts::{Alert, dispatch};
use crate::notify::{NotificationKind, is_valid_email};

pub fn handle(ctx: &Context<'_>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("test", sub)) => test(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn test(ctx: &Context<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let recipient = match sub.get_one::<String>("to") {
        Some(to) => Some(to.trim().to_string()),
        None => ctx.config.email.clone(),
    };
    let Some(recipient) = recipient else {
        bail!("No alert email configured. Use `spendwise config set email <address>` or --to.");
    };
    if !is_valid_email(&recipient) {
        bail!("Invalid email address '{}'", recipient);
    }
    let sink = ctx.sink()?;
    let mut notifier = ctx.notifier(sink.as_ref());
    notifier.recipient = Some(recipient.clone());
    let alert = Alert::new(
        NotificationKind::Test,
        json!({ "message": "Email alerts are working." }),
    );
    if dispatch(&notifier, &[alert]) == 1 {
        println!("Test email sent to {} via {}", recipient, ctx.config.notifier);
    } else {
        bail!("Test email to {} could not be delivered (see log)", recipient);
    }
    Ok(())
}
