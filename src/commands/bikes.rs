// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::models::{BikeStatus, Snapshot};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use serde::Serialize;
use std::str::FromStr;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("sell", sub)) => sell(conn, sub)?,
        Some(("keep", sub)) => keep(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let unlinked = delete_bike(conn, id)?;
            println!("Removed bike #{} (unlinked {} expense(s))", id, unlinked);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let model = sub.get_one::<String>("model").unwrap();
    let nickname = sub.get_one::<String>("nickname").map(|s| s.to_string());
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let price = parse_decimal(sub.get_one::<String>("price").unwrap())?;
    let other = parse_decimal(sub.get_one::<String>("other-costs").unwrap())?;
    let notes = sub.get_one::<String>("notes").map(|s| s.to_string());

    conn.execute(
        "INSERT INTO bikes(model, nickname, buy_date, buy_price, other_costs, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            model,
            nickname,
            date.to_string(),
            price.to_string(),
            other.to_string(),
            notes
        ],
    )?;
    let id = conn.last_insert_rowid();
    println!("Added bike #{} '{}' bought {} for {}", id, model, date, fmt_money(&price));
    Ok(())
}

#[derive(Serialize)]
pub struct BikeRow {
    pub id: i64,
    pub bike: String,
    pub status: String,
    pub buy_date: String,
    pub total_cost: String,
    pub sell_price: String,
    pub profit: String,
}

/// Render rows for `bike list`. A Kept bike shows an imputed sale price
/// equal to its cost; a not-applicable profit renders as a dash, which is
/// not the same thing as $0.
pub fn list_rows(snapshot: &Snapshot, status: Option<BikeStatus>) -> Vec<BikeRow> {
    snapshot
        .bikes
        .iter()
        .filter(|b| status.is_none_or(|s| b.status == s))
        .map(|b| {
            let cost = ledger::total_cost(b, &snapshot.expenses);
            let sell = match b.status {
                BikeStatus::Kept => Some(cost),
                _ => b.sell_price,
            };
            BikeRow {
                id: b.id,
                bike: b.label().to_string(),
                status: b.status.to_string(),
                buy_date: b.buy_date.to_string(),
                total_cost: fmt_money(&cost),
                sell_price: sell.map(|p| fmt_money(&p)).unwrap_or_else(|| "-".into()),
                profit: ledger::profit(b, &snapshot.expenses)
                    .map(|p| fmt_money(&p))
                    .unwrap_or_else(|| "-".into()),
            }
        })
        .collect()
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let status = sub
        .get_one::<String>("status")
        .map(|s| BikeStatus::from_str(s))
        .transpose()?;

    let snapshot = crate::utils::load_snapshot(conn)?;
    let data = list_rows(&snapshot, status);
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.bike.clone(),
                    r.status.clone(),
                    r.buy_date.clone(),
                    r.total_cost.clone(),
                    r.sell_price.clone(),
                    r.profit.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Bike", "Status", "Bought", "Total Cost", "Sell", "Profit"],
                rows,
            )
        );
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    if !crate::utils::bike_exists(conn, id)? {
        bail!("Bike #{} not found", id);
    }

    let mut sets: Vec<&str> = Vec::new();
    let mut vals: Vec<String> = Vec::new();
    if let Some(model) = sub.get_one::<String>("model") {
        sets.push("model=?");
        vals.push(model.clone());
    }
    if let Some(nick) = sub.get_one::<String>("nickname") {
        sets.push("nickname=?");
        vals.push(nick.clone());
    }
    if let Some(status) = sub.get_one::<String>("status") {
        let status = BikeStatus::from_str(status)?;
        sets.push("status=?");
        vals.push(status.as_str().to_string());
        if status != BikeStatus::Sold {
            // Sale fields only mean something on a Sold bike.
            sets.push("sell_price=NULL");
            sets.push("sell_date=NULL");
        }
    }
    if let Some(p) = sub.get_one::<String>("buy-price") {
        sets.push("buy_price=?");
        vals.push(parse_decimal(p)?.to_string());
    }
    if let Some(o) = sub.get_one::<String>("other-costs") {
        sets.push("other_costs=?");
        vals.push(parse_decimal(o)?.to_string());
    }
    if let Some(n) = sub.get_one::<String>("notes") {
        sets.push("notes=?");
        vals.push(n.clone());
    }
    if sets.is_empty() {
        println!("Nothing to change for bike #{}", id);
        return Ok(());
    }

    let sql = format!("UPDATE bikes SET {} WHERE id=?", sets.join(", "));
    vals.push(id.to_string());
    let params: Vec<&dyn rusqlite::ToSql> =
        vals.iter().map(|s| s as &dyn rusqlite::ToSql).collect();
    conn.execute(&sql, rusqlite::params_from_iter(params))
        .with_context(|| format!("Update bike #{}", id))?;
    println!("Updated bike #{}", id);
    Ok(())
}

fn sell(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let price = parse_decimal(sub.get_one::<String>("price").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => Utc::now().date_naive(),
    };
    let n = conn.execute(
        "UPDATE bikes SET status='Sold', sell_price=?1, sell_date=?2 WHERE id=?3",
        params![price.to_string(), date.to_string(), id],
    )?;
    if n == 0 {
        bail!("Bike #{} not found", id);
    }
    println!("Bike #{} sold {} for {}", id, date, fmt_money(&price));
    Ok(())
}

fn keep(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let n = conn.execute(
        "UPDATE bikes SET status='Kept', sell_price=NULL, sell_date=NULL WHERE id=?1",
        params![id],
    )?;
    if n == 0 {
        bail!("Bike #{} not found", id);
    }
    println!("Bike #{} kept (booked break-even)", id);
    Ok(())
}

/// Delete a bike and clear the link on every expense pointing at it, in one
/// transaction. Expenses themselves are never deleted; they fall back to
/// general expenses. Returns how many were unlinked.
pub fn delete_bike(conn: &mut Connection, id: i64) -> Result<usize> {
    let tx = conn.transaction()?;
    let unlinked = tx.execute(
        "UPDATE expenses SET bike_id=NULL WHERE bike_id=?1",
        params![id],
    )?;
    let deleted = tx.execute("DELETE FROM bikes WHERE id=?1", params![id])?;
    if deleted == 0 {
        bail!("Bike #{} not found", id);
    }
    tx.commit()?;
    Ok(unlinked)
}
