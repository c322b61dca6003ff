// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::utils::{fmt_money, load_snapshot, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");

    let snapshot = load_snapshot(conn)?;
    let metrics = ledger::metrics(&snapshot);
    if maybe_print_json(json_flag, jsonl_flag, &metrics)? {
        return Ok(());
    }

    let accrual = vec![
        vec!["Revenue".into(), fmt_money(&metrics.total_revenue)],
        vec!["COGS".into(), fmt_money(&metrics.total_cogs)],
        vec!["Gross Profit".into(), fmt_money(&metrics.gross_profit)],
        vec!["General Expenses".into(), fmt_money(&metrics.general_expenses)],
        vec!["Net Profit".into(), fmt_money(&metrics.net_profit)],
        vec!["Inventory Value".into(), fmt_money(&metrics.inventory_value)],
    ];
    println!("{}", pretty_table(&["P&L", "Amount"], accrual));

    let cash = vec![
        vec!["Net Capital".into(), fmt_money(&metrics.net_capital)],
        vec!["Bike Outflow".into(), fmt_money(&metrics.total_bike_outflow)],
        vec!["Free Cash".into(), fmt_money(&metrics.free_cash)],
    ];
    println!("{}", pretty_table(&["Cash", "Amount"], cash));

    let counts = vec![vec![
        metrics.sold_count.to_string(),
        metrics.inventory_count.to_string(),
        metrics.kept_count.to_string(),
    ]];
    println!("{}", pretty_table(&["Sold", "In Inventory", "Kept"], counts));

    let balances = ledger::balances(&snapshot.capital, &snapshot.partners);
    if !balances.is_empty() {
        let rows: Vec<Vec<String>> = balances
            .iter()
            .map(|(name, bal)| vec![name.clone(), fmt_money(bal)])
            .collect();
        println!("{}", pretty_table(&["Bro", "Balance"], rows));
    }
    Ok(())
}
