// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args(cmd: Command) -> Command {
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

fn required(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn optional(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

fn flag(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).action(ArgAction::SetTrue).help(help)
}

fn range_args(cmd: Command) -> Command {
    cmd.arg(optional("from", "First day YYYY-MM-DD"))
        .arg(optional("to", "Last day YYYY-MM-DD"))
        .arg(
            optional("month", "Start the window on the first day of YYYY-MM")
                .conflicts_with("from"),
        )
}

fn view_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("account")
            .long("account")
            .action(ArgAction::Append)
            .help("Show this account (repeatable, default all)"),
    )
    .arg(
        Arg::new("sort")
            .long("sort")
            .value_parser(["name", "balance", "final-balance", "activity", "custom"])
            .help("Account column order; custom keeps the --account order"),
    )
    .arg(flag("desc", "Descending account order"))
}

fn list_filters(cmd: Command) -> Command {
    json_args(
        cmd.arg(optional("month", "Only YYYY-MM"))
            .arg(optional("account", "Only this account"))
            .arg(
                Arg::new("limit")
                    .long("limit")
                    .value_parser(value_parser!(usize))
                    .help("Show at most N rows"),
            ),
    )
}

pub fn build_cli() -> Command {
    Command::new("cashtrail")
        .about("Personal finance tracking with a daily account ledger")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .arg(required("name", "Account name"))
                        .arg(
                            Arg::new("balance")
                                .long("balance")
                                .default_value("0")
                                .allow_hyphen_values(true)
                                .help("Initial balance"),
                        ),
                )
                .subcommand(json_args(Command::new("list")))
                .subcommand(Command::new("rm").arg(required("name", "Account name")))
                .subcommand(
                    Command::new("rename")
                        .arg(required("name", "Current name"))
                        .arg(required("to", "New name")),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add").arg(required("name", "Category name")).arg(
                        Arg::new("kind")
                            .long("kind")
                            .default_value("expense")
                            .value_parser(["income", "expense"]),
                    ),
                )
                .subcommand(Command::new("list"))
                .subcommand(Command::new("rm").arg(required("name", "Category name"))),
        )
        .subcommand(
            Command::new("expense")
                .about("Record and list expenses")
                .subcommand(
                    Command::new("add")
                        .arg(required("date", "Purchase date YYYY-MM-DD"))
                        .arg(required("amount", "Total amount"))
                        .arg(required("account", "Account paid from"))
                        .arg(optional("category", "Category name"))
                        .arg(optional("description", "Free text"))
                        .arg(optional("due", "Due date YYYY-MM-DD, if different"))
                        .arg(
                            Arg::new("installments")
                                .long("installments")
                                .value_parser(value_parser!(u32).range(1..=120))
                                .help("Split into N monthly installments"),
                        )
                        .arg(flag("credit-card", "Paid by credit card"))
                        .arg(flag("paid", "Already paid")),
                )
                .subcommand(list_filters(
                    Command::new("list")
                        .arg(optional("category", "Only this category"))
                        .arg(flag("unpaid", "Only unpaid expenses")),
                ))
                .subcommand(Command::new("pay").arg(required("id", "Expense id")))
                .subcommand(
                    Command::new("rm")
                        .arg(required("id", "Expense id"))
                        .arg(flag("group", "Remove every installment of the purchase")),
                ),
        )
        .subcommand(
            Command::new("income")
                .about("Record and list income")
                .subcommand(
                    Command::new("add")
                        .arg(required("date", "Date YYYY-MM-DD"))
                        .arg(required("amount", "Amount"))
                        .arg(required("account", "Account credited"))
                        .arg(optional("source", "Where the money came from"))
                        .arg(optional("notes", "Free text")),
                )
                .subcommand(list_filters(Command::new("list")))
                .subcommand(Command::new("rm").arg(required("id", "Income id"))),
        )
        .subcommand(
            Command::new("transfer")
                .about("Move money between accounts")
                .subcommand(
                    Command::new("add")
                        .arg(required("date", "Date YYYY-MM-DD"))
                        .arg(required("amount", "Amount"))
                        .arg(required("from", "Source account"))
                        .arg(required("to", "Destination account"))
                        .arg(optional("description", "Free text")),
                )
                .subcommand(list_filters(Command::new("list")))
                .subcommand(Command::new("rm").arg(required("id", "Transfer id"))),
        )
        .subcommand(
            Command::new("summary")
                .about("Daily ledger and dashboard")
                .subcommand(json_args(view_args(range_args(Command::new("daily")))))
                .subcommand(json_args(
                    Command::new("dashboard").arg(optional("month", "YYYY-MM, default current")),
                )),
        )
        .subcommand(
            Command::new("export").about("Write reports to files").subcommand(view_args(range_args(
                Command::new("summary")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv or json"),
                    )
                    .arg(required("out", "Output file")),
            ))),
        )
        .subcommand(
            Command::new("settings")
                .about("Read and change settings")
                .subcommand(Command::new("get").arg(required("key", "Setting name")))
                .subcommand(
                    Command::new("set")
                        .arg(required("key", "Setting name"))
                        .arg(required("value", "New value")),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(Command::new("doctor").about("Check stored data for problems"))
}
