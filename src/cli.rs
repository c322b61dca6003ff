// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, value_parser, Arg, ArgAction, Command};

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

fn bike_id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(value_parser!(i64))
        .help("Bike id")
}

fn bike_cmd() -> Command {
    Command::new("bike")
        .about("Inventory: track, sell, keep, or drop bikes")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a bike to inventory")
                .arg(Arg::new("model").long("model").required(true))
                .arg(Arg::new("nickname").long("nickname"))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .required(true)
                        .help("Purchase date (YYYY-MM-DD)"),
                )
                .arg(
                    Arg::new("price")
                        .long("price")
                        .required(true)
                        .help("Purchase price"),
                )
                .arg(
                    Arg::new("other-costs")
                        .long("other-costs")
                        .default_value("0")
                        .help("Incidental costs paid at purchase"),
                )
                .arg(Arg::new("notes").long("notes")),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List bikes with total cost and profit")
                .arg(
                    Arg::new("status")
                        .long("status")
                        .help("Filter: 'In Inventory', 'Sold' or 'Kept'"),
                ),
        ))
        .subcommand(
            Command::new("edit")
                .about("Edit bike fields (only the flags given are changed)")
                .arg(bike_id_arg())
                .arg(Arg::new("model").long("model"))
                .arg(Arg::new("nickname").long("nickname"))
                .arg(Arg::new("status").long("status"))
                .arg(Arg::new("buy-price").long("buy-price"))
                .arg(Arg::new("other-costs").long("other-costs"))
                .arg(Arg::new("notes").long("notes")),
        )
        .subcommand(
            Command::new("sell")
                .about("Mark a bike sold")
                .arg(bike_id_arg())
                .arg(
                    Arg::new("price")
                        .long("price")
                        .required(true)
                        .help("Sale price"),
                )
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("Sale date (YYYY-MM-DD, default today)"),
                ),
        )
        .subcommand(
            Command::new("keep")
                .about("Keep a bike for personal use (books break-even)")
                .arg(bike_id_arg()),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a bike; linked expenses are unlinked, never deleted")
                .arg(bike_id_arg()),
        )
}

fn expense_cmd() -> Command {
    Command::new("expense")
        .about("Cost events, general or linked to a bike")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Record an expense (partner payers auto-book a contribution)")
                .arg(Arg::new("date").long("date").required(true))
                .arg(Arg::new("description").long("description").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(
                    Arg::new("category")
                        .long("category")
                        .default_value("General")
                        .help("e.g. Marketing, Tools, Rent, Transport, Utilities, Software, Other"),
                )
                .arg(
                    Arg::new("bike")
                        .long("bike")
                        .value_parser(value_parser!(i64))
                        .help("Bike id this expense belongs to (omit for a general expense)"),
                )
                .arg(
                    Arg::new("paid-by")
                        .long("paid-by")
                        .default_value("Business")
                        .help("'Business' or a partner name"),
                ),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List expenses")
                .arg(Arg::new("month").long("month").help("Filter YYYY-MM"))
                .arg(
                    Arg::new("bike")
                        .long("bike")
                        .value_parser(value_parser!(i64))
                        .help("Only expenses linked to this bike"),
                ),
        ))
        .subcommand(
            Command::new("rm")
                .about("Delete an expense")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
        )
}

fn capital_cmd() -> Command {
    Command::new("capital")
        .about("Partner capital contributions and withdrawals")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Record a capital movement")
                .arg(Arg::new("partner").long("partner").required(true))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .required(true)
                        .help("'contribution' or 'withdrawal'"),
                )
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("date").long("date").required(true))
                .arg(Arg::new("description").long("description")),
        )
        .subcommand(json_flags(Command::new("list").about("List capital entries")))
        .subcommand(
            Command::new("rm")
                .about("Delete a capital entry")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
        )
}

fn bro_cmd() -> Command {
    Command::new("bro")
        .about("Partner roster and balances")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a partner")
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(json_flags(
            Command::new("list").about("List partners with running balances"),
        ))
        .subcommand(
            Command::new("rename")
                .about("Rename a partner (history untouched unless --update-history)")
                .arg(Arg::new("old").required(true))
                .arg(Arg::new("new").required(true))
                .arg(
                    Arg::new("update-history")
                        .long("update-history")
                        .action(ArgAction::SetTrue)
                        .help("Also rewrite capital entries and expense payers"),
                ),
        )
        .subcommand(
            Command::new("rm")
                .about("Remove a partner (their capital history stays)")
                .arg(Arg::new("name").required(true)),
        )
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Narrative report payload and AI generation")
        .subcommand_required(true)
        .subcommand(Command::new("payload").about("Print the report data payload as JSON"))
        .subcommand(Command::new("ai").about("Generate a narrative report via Gemini"))
        .subcommand(
            Command::new("set-key")
                .about("Store the Gemini API key (GEMINI_API_KEY env overrides)")
                .arg(Arg::new("key").required(true)),
        )
}

fn export_cmd() -> Command {
    let fmt = Arg::new("format").long("format").default_value("csv");
    let out = Arg::new("out").long("out").required(true);
    Command::new("export")
        .about("Export a ledger to csv or json")
        .subcommand_required(true)
        .subcommand(
            Command::new("bikes")
                .arg(fmt.clone())
                .arg(out.clone()),
        )
        .subcommand(
            Command::new("expenses")
                .arg(fmt.clone())
                .arg(out.clone()),
        )
        .subcommand(Command::new("capital").arg(fmt).arg(out))
}

pub fn build_cli() -> Command {
    Command::new("flipledger")
        .version(crate_version!())
        .about("Used-bike flip bookkeeping: inventory, expenses, partner capital, KPIs")
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(bike_cmd())
        .subcommand(expense_cmd())
        .subcommand(capital_cmd())
        .subcommand(bro_cmd())
        .subcommand(json_flags(
            Command::new("dashboard").about("Business KPIs: accrual and cash views"),
        ))
        .subcommand(report_cmd())
        .subcommand(export_cmd())
        .subcommand(Command::new("doctor").about("Data-quality checks (read-only)"))
}
