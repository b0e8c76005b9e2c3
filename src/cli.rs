// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn signed_amount(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .allow_negative_numbers(true)
        .help(help)
}

fn method_arg() -> Arg {
    Arg::new("method")
        .long("method")
        .value_parser(["online", "cash"])
        .help("Payment method")
}

fn type_arg() -> Arg {
    Arg::new("type")
        .long("type")
        .value_parser(["expense", "income"])
}

pub fn build_cli() -> Command {
    Command::new("spendwise")
        .about("Expense tracking with online/cash balances, reconciliation, budgets, and alerts")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("owner")
                .long("owner")
                .global(true)
                .help("Act as this owner id instead of the configured one"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging (RUST_LOG takes precedence)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("config")
                .about("Profile settings")
                .subcommand(
                    Command::new("set")
                        .arg(
                            Arg::new("key")
                                .required(true)
                                .value_parser(["owner", "email", "notifier", "mail_from"]),
                        )
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(json_flags(Command::new("show"))),
        )
        .subcommand(
            Command::new("balance")
                .about("Current balances")
                .subcommand(
                    Command::new("setup")
                        .about("First-run balance setup")
                        .arg(signed_amount("online", "Online balance"))
                        .arg(signed_amount("cash", "Cash balance"))
                        .arg(
                            Arg::new("skip")
                                .long("skip")
                                .action(ArgAction::SetTrue)
                                .conflicts_with_all(["online", "cash"])
                                .help("Start from zero"),
                        ),
                )
                .subcommand(json_flags(Command::new("show")))
                .subcommand(
                    Command::new("adjust")
                        .about("Correct balances with an audited reason")
                        .arg(signed_amount("online", "Online change (+ add / - remove)"))
                        .arg(signed_amount("cash", "Cash change (+ add / - remove)"))
                        .arg(Arg::new("reason").long("reason").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("history").about("Recent adjustments").arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize))
                            .default_value("5"),
                    ),
                ))
                .subcommand(
                    Command::new("sync")
                        .about("Resolve a discrepancy between balances and transactions")
                        .arg(
                            Arg::new("to")
                                .long("to")
                                .required(true)
                                .value_parser(["current", "transactions"]),
                        ),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .default_value("Food"),
                        )
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, default today"))
                        .arg(method_arg().default_value("online"))
                        .arg(Arg::new("description").long("description"))
                        .arg(type_arg().default_value("expense"))
                        .arg(
                            Arg::new("affect_balance")
                                .long("affect-balance")
                                .action(ArgAction::SetTrue)
                                .help("Let a past-dated entry change the current balance"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("month").long("month"))
                        .arg(Arg::new("from").long("from"))
                        .arg(Arg::new("to").long("to"))
                        .arg(type_arg())
                        .arg(method_arg())
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly budget goal")
                .subcommand(Command::new("set").arg(Arg::new("amount").required(true)))
                .subcommand(json_flags(
                    Command::new("show").arg(Arg::new("month").long("month")),
                )),
        )
        .subcommand(
            Command::new("recurring")
                .about("Recurring transactions")
                .subcommand(
                    Command::new("add")
                        .arg(type_arg().default_value("expense"))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .default_value("Bills"),
                        )
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .default_value(""),
                        )
                        .arg(method_arg().default_value("online"))
                        .arg(
                            Arg::new("frequency")
                                .long("frequency")
                                .value_parser(["weekly", "monthly", "yearly"])
                                .default_value("monthly"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("run").about("Execute a template now").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Reports")
                .subcommand(json_flags(Command::new("summary")))
                .subcommand(json_flags(
                    Command::new("by-category").arg(Arg::new("month").long("month")),
                ))
                .subcommand(json_flags(
                    Command::new("monthly").arg(
                        Arg::new("months")
                            .long("months")
                            .value_parser(value_parser!(usize))
                            .default_value("12"),
                    ),
                )),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .required(true)
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(json_flags(
            Command::new("doctor").about("Compare balances against transaction history"),
        ))
        .subcommand(
            Command::new("alerts").about("Email alerts").subcommand(
                Command::new("test")
                    .about("Send a test email")
                    .arg(Arg::new("to").long("to").help("Recipient, default configured email")),
            ),
        )
}
