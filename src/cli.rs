// Copyright (c) 2025 Casabook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

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
            .help("Print as JSON lines"),
    )
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record, list, edit, and delete transactions")
        .subcommand(
            Command::new("add")
                .about("Record a transaction (optionally a monthly recurring series)")
                .arg(Arg::new("date").long("date").required(true).help("YYYY-MM-DD"))
                .arg(Arg::new("description").long("description").required(true))
                .arg(Arg::new("amount").long("amount").required(true).help("Positive magnitude"))
                .arg(Arg::new("kind").long("kind").required(true).help("income|expense"))
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("recurring")
                        .long("recurring")
                        .action(ArgAction::SetTrue)
                        .help("Expand into a monthly series starting at --date"),
                )
                .arg(
                    Arg::new("until")
                        .long("until")
                        .help("Last occurrence date (YYYY-MM-DD); default 5 years out"),
                ),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List transactions")
                .arg(Arg::new("month").long("month").help("YYYY-MM"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("kind").long("kind").help("income|expense"))
                .arg(Arg::new("series").long("series").help("Series id"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("edit")
                .about("Replace fields of one transaction (series siblings untouched)")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(Arg::new("date").long("date"))
                .arg(Arg::new("description").long("description"))
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("category").long("category")),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a transaction, optionally with its series")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(
                    Arg::new("scope")
                        .long("scope")
                        .default_value("one")
                        .help("one|future|all"),
                ),
        )
}

fn category_cmd() -> Command {
    Command::new("category")
        .about("Manage categories")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("kind").long("kind").required(true).help("income|expense"))
                .arg(Arg::new("icon").long("icon"))
                .arg(Arg::new("color").long("color")),
        )
        .subcommand(json_flags(Command::new("list")))
        .subcommand(Command::new("rm").arg(Arg::new("name").long("name").required(true)))
}

fn budget_cmd() -> Command {
    Command::new("budget")
        .about("Per-category monthly spending limits")
        .subcommand(
            Command::new("set")
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("limit").long("limit").required(true)),
        )
        .subcommand(json_flags(Command::new("list")))
        .subcommand(json_flags(
            Command::new("report")
                .about("Limit vs spent per category for a month")
                .arg(Arg::new("month").long("month").required(true).help("YYYY-MM")),
        ))
        .subcommand(Command::new("rm").arg(Arg::new("category").long("category").required(true)))
}

fn goal_cmd() -> Command {
    Command::new("goal")
        .about("Savings goals")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("target").long("target").required(true))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("deadline").long("deadline").help("YYYY-MM-DD")),
        )
        .subcommand(json_flags(Command::new("list")))
        .subcommand(
            Command::new("fund")
                .about("Add funds toward a goal")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("amount").long("amount").required(true)),
        )
        .subcommand(Command::new("rm").arg(Arg::new("name").long("name").required(true)))
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Summaries")
        .subcommand(json_flags(
            Command::new("cashflow").arg(
                Arg::new("months")
                    .long("months")
                    .value_parser(value_parser!(usize)),
            ),
        ))
        .subcommand(json_flags(
            Command::new("spend-by-category")
                .arg(Arg::new("month").long("month").required(true).help("YYYY-MM")),
        ))
        .subcommand(json_flags(
            Command::new("recurring").about("Active recurring series and their next occurrence"),
        ))
}

fn export_cmd() -> Command {
    Command::new("export").about("Export data").subcommand(
        Command::new("transactions")
            .arg(Arg::new("format").long("format").required(true).help("csv|json"))
            .arg(Arg::new("out").long("out").required(true)),
    )
}

pub fn build_cli() -> Command {
    Command::new("casabook")
        .about("Family finance tracker: transactions, recurring series, budgets, savings goals")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(category_cmd())
        .subcommand(tx_cmd())
        .subcommand(budget_cmd())
        .subcommand(goal_cmd())
        .subcommand(report_cmd())
        .subcommand(export_cmd())
        .subcommand(Command::new("doctor").about("Check data integrity"))
}
