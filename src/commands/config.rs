// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::{Context, output_flags, required};
use crate::config::{RESEND_KEY_ENV, set_setting};
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(ctx: &Context<'_>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let key = required(sub, "key")?;
            let value = required(sub, "value")?;
            set_setting(ctx.conn, key, value)?;
            println!("Set {} = {}", key, value.trim());
        }
        Some(("show", sub)) => show(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn show(ctx: &Context<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let cfg = &ctx.config;
    if !maybe_print_json(json_flag, jsonl_flag, cfg)? {
        let key_state = if cfg.resend_api_key.is_some() { "set" } else { "not set" };
        let rows = vec![
            vec!["owner".to_string(), cfg.owner.clone()],
            vec!["email".to_string(), cfg.email.clone().unwrap_or_default()],
            vec!["notifier".to_string(), cfg.notifier.to_string()],
            vec!["mail_from".to_string(), cfg.mail_from.clone()],
            vec![RESEND_KEY_ENV.to_string(), key_state.to_string()],
        ];
        println!("{}", pretty_table(&["Setting", "Value"], rows));
    }
    Ok(())
}
