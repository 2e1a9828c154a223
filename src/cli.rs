// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

pub const DEFAULT_WALLET: &str = "Principal";

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .help("Print pretty JSON")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .help("Print one JSON object per line")
            .action(ArgAction::SetTrue)
            .conflicts_with("json"),
    )
}

fn wallet_arg() -> Arg {
    Arg::new("wallet")
        .long("wallet")
        .short('w')
        .default_value(DEFAULT_WALLET)
        .help("Wallet name")
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .short('m')
        .help("Month as YYYY-MM (defaults to the current month)")
}

fn type_arg() -> Arg {
    Arg::new("type")
        .long("type")
        .short('t')
        .value_parser(["income", "expense"])
}

pub fn build_cli() -> Command {
    Command::new("parcela")
        .version(crate_version!())
        .about("Wallet ledger with installments, recurring entries and monthly rollups")
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log engine activity to stderr"),
        )
        .subcommand(Command::new("init").about("Create the database and seed defaults"))
        .subcommand(
            Command::new("wallet")
                .about("Manage wallets")
                .subcommand(Command::new("add").arg(Arg::new("name").required(true)))
                .subcommand(json_args(Command::new("list")))
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true))),
        )
        .subcommand(
            Command::new("card")
                .about("Manage credit cards")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("limit").long("limit").required(true)),
                )
                .subcommand(json_args(Command::new("list")))
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true)))
                .subcommand(json_args(
                    Command::new("usage")
                        .about("Limit used per card for a month")
                        .arg(month_arg()),
                )),
        )
        .subcommand(
            Command::new("category")
                .about("Manage income and expense categories")
                .subcommand(
                    Command::new("add")
                        .arg(type_arg().required(true))
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(Command::new("list").arg(type_arg()))
                .subcommand(
                    Command::new("rm")
                        .arg(type_arg().required(true))
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record, list and delete transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today"))
                        .arg(wallet_arg())
                        .arg(type_arg().required(true))
                        .arg(Arg::new("category").long("category").short('c').required(true))
                        .arg(Arg::new("amount").long("amount").short('a').required(true))
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .short('d')
                                .required(true),
                        )
                        .arg(Arg::new("card").long("card").help("Credit card name (expenses only)"))
                        .arg(
                            Arg::new("installments")
                                .long("installments")
                                .short('n')
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(
                            Arg::new("recurring")
                                .long("recurring")
                                .short('r')
                                .help("daily|weekly|monthly|yearly"),
                        )
                        .arg(Arg::new("until").long("until").help("Last recurrence date"))
                        .arg(
                            Arg::new("horizon")
                                .long("horizon")
                                .help("Generate recurrences up to this date"),
                        ),
                )
                .subcommand(json_args(
                    Command::new("list")
                        .arg(month_arg())
                        .arg(wallet_arg())
                        .arg(type_arg())
                        .arg(Arg::new("category").long("category").short('c'))
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
            Command::new("report")
                .about("Monthly summaries, trends and card exposure")
                .subcommand(json_args(
                    Command::new("month").arg(month_arg()).arg(wallet_arg()),
                ))
                .subcommand(json_args(
                    Command::new("trend")
                        .arg(wallet_arg())
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(Arg::new("end").long("end").help("Last month as YYYY-MM")),
                ))
                .subcommand(json_args(Command::new("cards").arg(month_arg())))
                .subcommand(json_args(
                    Command::new("insights")
                        .arg(wallet_arg())
                        .arg(
                            Arg::new("metric")
                                .long("metric")
                                .default_value("balance")
                                .value_parser(["balance", "income", "expense", "savings"]),
                        )
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(Arg::new("end").long("end")),
                )),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true))
                    .arg(Arg::new("wallet").long("wallet").short('w')),
            ),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(json_args(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check the ledger for dangling references"))
}
