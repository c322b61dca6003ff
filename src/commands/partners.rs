// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::utils::{fmt_money, load_snapshot, maybe_print_json, pretty_table};
use anyhow::{bail, Result};
use rusqlite::{params, Connection};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            if name.is_empty() || name == crate::models::BUSINESS_PAYER {
                bail!("'{}' is not a usable partner name", name);
            }
            conn.execute("INSERT INTO partners(name) VALUES (?1)", params![name])?;
            println!("Added bro '{}'", name);
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rename", sub)) => rename(conn, sub)?,
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let n = conn.execute("DELETE FROM partners WHERE name=?1", params![name])?;
            if n == 0 {
                bail!("Partner '{}' not found", name);
            }
            // Capital history stays; their balance keeps showing implicitly.
            println!("Removed bro '{}' (capital history kept)", name);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct BalanceRow {
    pub partner: String,
    pub balance: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let snapshot = load_snapshot(conn)?;
    let balances = ledger::balances(&snapshot.capital, &snapshot.partners);
    let data: Vec<BalanceRow> = balances
        .iter()
        .map(|(name, bal)| BalanceRow {
            partner: name.clone(),
            balance: fmt_money(bal),
        })
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| vec![r.partner.clone(), r.balance.clone()])
            .collect();
        println!("{}", pretty_table(&["Bro", "Balance"], rows));
    }
    Ok(())
}

/// Rename a roster entry. Capital entries and expense payers reference
/// partners by display name, so history keeps the old spelling unless the
/// caller opts into the rewrite.
fn rename(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let old = sub.get_one::<String>("old").unwrap();
    let new = sub.get_one::<String>("new").unwrap();
    let update_history = sub.get_flag("update-history");

    let n = conn.execute(
        "UPDATE partners SET name=?1 WHERE name=?2",
        params![new, old],
    )?;
    if n == 0 {
        bail!("Partner '{}' not found", old);
    }
    if update_history {
        let caps = conn.execute(
            "UPDATE capital SET partner_name=?1 WHERE partner_name=?2",
            params![new, old],
        )?;
        let exps = conn.execute(
            "UPDATE expenses SET paid_by=?1 WHERE paid_by=?2",
            params![new, old],
        )?;
        println!(
            "Renamed '{}' to '{}' ({} capital entr(ies), {} expense(s) migrated)",
            old, new, caps, exps
        );
    } else {
        println!(
            "Renamed '{}' to '{}' (history untouched; use --update-history to migrate)",
            old, new
        );
    }
    Ok(())
}
