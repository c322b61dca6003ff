// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::CapitalType;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{bail, Result};
use rusqlite::{params, Connection};
use serde::Serialize;
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let n = conn.execute("DELETE FROM capital WHERE id=?1", params![id])?;
            if n == 0 {
                bail!("Capital entry #{} not found", id);
            }
            println!("Removed capital entry #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let partner = sub.get_one::<String>("partner").unwrap();
    let kind = CapitalType::from_str(sub.get_one::<String>("type").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let description = sub.get_one::<String>("description").map(|s| s.to_string());

    if !crate::utils::partner_exists(conn, partner)? {
        // Name-string linkage: entries for off-roster names are legal, but
        // worth a heads-up since a typo silently opens a new balance.
        eprintln!("note: '{}' is not on the partner roster", partner);
    }
    conn.execute(
        "INSERT INTO capital(partner_name, type, amount, date, description)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            partner,
            kind.as_str(),
            amount.to_string(),
            date.to_string(),
            description
        ],
    )?;
    println!(
        "Recorded {} of {} for {} on {}",
        kind.as_str().to_lowercase(),
        fmt_money(&amount),
        partner,
        date
    );
    Ok(())
}

#[derive(Serialize)]
pub struct CapitalRow {
    pub id: i64,
    pub date: String,
    pub partner: String,
    pub kind: String,
    pub amount: String,
    pub description: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut stmt = conn.prepare(
        "SELECT id, date, partner_name, type, amount, description
         FROM capital ORDER BY date DESC, id DESC",
    )?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let kind: String = r.get(3)?;
        let amount = crate::utils::amount_or_zero(r.get(4)?);
        let signed = if kind == "Withdrawal" {
            format!("-{}", fmt_money(&amount))
        } else {
            format!("+{}", fmt_money(&amount))
        };
        data.push(CapitalRow {
            id: r.get(0)?,
            date: r.get(1)?,
            partner: r.get(2)?,
            kind,
            amount: signed,
            description: r.get::<_, Option<String>>(5)?.unwrap_or_default(),
        });
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.partner.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Date", "Partner", "Type", "Amount", "Description"], rows)
        );
    }
    Ok(())
}
