// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{
    Bike, BikeStatus, CapitalEntry, CapitalType, Expense, Partner, Snapshot,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::str::FromStr;

const UA: &str = concat!(
    "flipledger/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/flipledger)"
);

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Stored amounts are TEXT; a missing or unparseable value loads as zero so
/// the dashboard still renders with incomplete records. `doctor` is where
/// bad amounts get surfaced.
pub fn amount_or_zero(s: Option<String>) -> Decimal {
    s.and_then(|v| v.trim().parse::<Decimal>().ok())
        .unwrap_or(Decimal::ZERO)
}

/// Optional price column: absent stays absent (distinct from zero).
pub fn opt_amount(s: Option<String>) -> Option<Decimal> {
    s.and_then(|v| v.trim().parse::<Decimal>().ok())
}

pub fn fmt_money(d: &Decimal) -> String {
    if d.is_sign_negative() {
        format!("-${:.2}", d.abs())
    } else {
        format!("${:.2}", d)
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn bike_exists(conn: &Connection, id: i64) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM bikes WHERE id=?1")?;
    let found: Option<i64> = stmt.query_row(params![id], |r| r.get(0)).optional()?;
    Ok(found.is_some())
}

pub fn partner_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM partners WHERE name=?1")?;
    let found: Option<i64> = stmt.query_row(params![name], |r| r.get(0)).optional()?;
    Ok(found.is_some())
}

// Settings
pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Read the whole ledger as one point-in-time snapshot. Every derivation in
/// [`crate::ledger`] works off one of these; nothing downstream touches the
/// connection again.
pub fn load_snapshot(conn: &Connection) -> Result<Snapshot> {
    let mut bikes = Vec::new();
    {
        let mut stmt = conn.prepare(
            "SELECT id, model, nickname, status, buy_date, buy_price, other_costs,
                    sell_date, sell_price, notes
             FROM bikes ORDER BY buy_date, id",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(r) = rows.next()? {
            let status_s: String = r.get(3)?;
            let buy_date_s: String = r.get(4)?;
            bikes.push(Bike {
                id: r.get(0)?,
                model: r.get(1)?,
                nickname: r.get(2)?,
                status: BikeStatus::from_str(&status_s).context("Bad status in bikes row")?,
                buy_date: parse_date(&buy_date_s)?,
                buy_price: amount_or_zero(r.get(5)?),
                other_costs: amount_or_zero(r.get(6)?),
                sell_date: {
                    let d: Option<String> = r.get(7)?;
                    d.as_deref().and_then(|s| parse_date(s).ok())
                },
                sell_price: opt_amount(r.get(8)?),
                notes: r.get(9)?,
            });
        }
    }

    let mut expenses = Vec::new();
    {
        let mut stmt = conn.prepare(
            "SELECT id, date, description, category, amount, paid_by, bike_id
             FROM expenses ORDER BY date, id",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(r) = rows.next()? {
            let date_s: String = r.get(1)?;
            expenses.push(Expense {
                id: r.get(0)?,
                date: parse_date(&date_s)?,
                description: r.get(2)?,
                category: r.get::<_, Option<String>>(3)?.unwrap_or_else(|| "General".into()),
                amount: amount_or_zero(r.get(4)?),
                paid_by: r
                    .get::<_, Option<String>>(5)?
                    .unwrap_or_else(|| crate::models::BUSINESS_PAYER.into()),
                bike_id: r.get(6)?,
            });
        }
    }

    let mut capital = Vec::new();
    {
        let mut stmt = conn.prepare(
            "SELECT id, partner_name, type, amount, date, description
             FROM capital ORDER BY date, id",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(r) = rows.next()? {
            let kind_s: String = r.get(2)?;
            let date_s: String = r.get(4)?;
            capital.push(CapitalEntry {
                id: r.get(0)?,
                partner_name: r.get(1)?,
                kind: CapitalType::from_str(&kind_s).context("Bad type in capital row")?,
                amount: amount_or_zero(r.get(3)?),
                date: parse_date(&date_s)?,
                description: r.get(5)?,
            });
        }
    }

    let mut partners = Vec::new();
    {
        let mut stmt = conn.prepare("SELECT id, name FROM partners ORDER BY name")?;
        let mut rows = stmt.query([])?;
        while let Some(r) = rows.next()? {
            partners.push(Partner {
                id: r.get(0)?,
                name: r.get(1)?,
            });
        }
    }

    Ok(Snapshot {
        bikes,
        expenses,
        capital,
        partners,
    })
}
