// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("bikes", sub)) => export_bikes(conn, sub),
        Some(("expenses", sub)) => export_expenses(conn, sub),
        Some(("capital", sub)) => export_capital(conn, sub),
        _ => Ok(()),
    }
}

fn export_bikes(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT model, nickname, status, buy_date, buy_price, other_costs, sell_date, sell_price, notes
         FROM bikes ORDER BY buy_date, id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, Option<String>>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, Option<String>>(6)?,
            r.get::<_, Option<String>>(7)?,
            r.get::<_, Option<String>>(8)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "model", "nickname", "status", "buy_date", "buy_price", "other_costs",
                "sell_date", "sell_price", "notes",
            ])?;
            for row in rows {
                let (m, n, st, bd, bp, oc, sd, sp, notes) = row?;
                wtr.write_record([
                    m,
                    n.unwrap_or_default(),
                    st,
                    bd,
                    bp,
                    oc,
                    sd.unwrap_or_default(),
                    sp.unwrap_or_default(),
                    notes.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (m, n, st, bd, bp, oc, sd, sp, notes) = row?;
                items.push(json!({
                    "model": m, "nickname": n, "status": st, "buy_date": bd,
                    "buy_price": bp, "other_costs": oc, "sell_date": sd,
                    "sell_price": sp, "notes": notes
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported bikes to {}", out);
    Ok(())
}

fn export_expenses(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT e.date, e.description, e.category, e.amount, e.paid_by, b.model
         FROM expenses e LEFT JOIN bikes b ON e.bike_id=b.id
         ORDER BY e.date, e.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, Option<String>>(5)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["date", "description", "category", "amount", "paid_by", "bike"])?;
            for row in rows {
                let (d, desc, cat, amt, payer, bike) = row?;
                wtr.write_record([
                    d,
                    desc,
                    cat.unwrap_or_default(),
                    amt,
                    payer.unwrap_or_default(),
                    bike.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (d, desc, cat, amt, payer, bike) = row?;
                items.push(json!({
                    "date": d, "description": desc, "category": cat,
                    "amount": amt, "paid_by": payer, "bike": bike
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported expenses to {}", out);
    Ok(())
}

fn export_capital(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT date, partner_name, type, amount, description
         FROM capital ORDER BY date, id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, Option<String>>(4)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["date", "partner", "type", "amount", "description"])?;
            for row in rows {
                let (d, p, t, amt, desc) = row?;
                wtr.write_record([d, p, t, amt, desc.unwrap_or_default()])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (d, p, t, amt, desc) = row?;
                items.push(json!({
                    "date": d, "partner": p, "type": t, "amount": amt, "description": desc
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported capital entries to {}", out);
    Ok(())
}
