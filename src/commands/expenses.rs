// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::BUSINESS_PAYER;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{bail, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let n = conn.execute("DELETE FROM expenses WHERE id=?1", params![id])?;
            if n == 0 {
                bail!("Expense #{} not found", id);
            }
            println!("Removed expense #{}", id);
        }
        _ => {}
    }
    Ok(())
}

pub struct NewExpense {
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub paid_by: String,
    pub bike_id: Option<i64>,
}

/// Record an expense. When the payer is a partner rather than the business,
/// the money they fronted is a capital contribution, so a matching
/// Contribution entry goes in within the same transaction; the two rows
/// either both land or neither does. Returns the new expense id.
pub fn record(conn: &mut Connection, e: &NewExpense) -> Result<i64> {
    if let Some(bike_id) = e.bike_id {
        if !crate::utils::bike_exists(conn, bike_id)? {
            bail!("Bike #{} not found", bike_id);
        }
    }
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO expenses(date, description, category, amount, paid_by, bike_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            e.date.to_string(),
            e.description,
            e.category,
            e.amount.to_string(),
            e.paid_by,
            e.bike_id
        ],
    )?;
    let id = tx.last_insert_rowid();
    if e.paid_by != BUSINESS_PAYER {
        tx.execute(
            "INSERT INTO capital(partner_name, type, amount, date, description)
             VALUES (?1, 'Contribution', ?2, ?3, ?4)",
            params![
                e.paid_by,
                e.amount.to_string(),
                e.date.to_string(),
                format!("Expense: {}", e.description)
            ],
        )?;
    }
    tx.commit()?;
    Ok(id)
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let e = NewExpense {
        date: parse_date(sub.get_one::<String>("date").unwrap())?,
        description: sub.get_one::<String>("description").unwrap().clone(),
        category: sub.get_one::<String>("category").unwrap().clone(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        paid_by: sub.get_one::<String>("paid-by").unwrap().clone(),
        bike_id: sub.get_one::<i64>("bike").copied(),
    };
    let id = record(conn, &e)?;
    if e.paid_by != BUSINESS_PAYER {
        println!(
            "Recorded expense #{} {} '{}' (+{} contribution for {})",
            id,
            fmt_money(&e.amount),
            e.description,
            fmt_money(&e.amount),
            e.paid_by
        );
    } else {
        println!("Recorded expense #{} {} '{}'", id, fmt_money(&e.amount), e.description);
    }
    Ok(())
}

#[derive(Serialize)]
pub struct ExpenseRow {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub category: String,
    pub amount: String,
    pub paid_by: String,
    pub bike: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<ExpenseRow>> {
    let mut sql = String::from(
        "SELECT e.id, e.date, e.description, e.category, e.amount, e.paid_by,
                b.nickname, b.model
         FROM expenses e LEFT JOIN bikes b ON e.bike_id=b.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(e.date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(bike) = sub.get_one::<i64>("bike") {
        sql.push_str(" AND e.bike_id=?");
        params_vec.push(bike.to_string());
    }
    sql.push_str(" ORDER BY e.date DESC, e.id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let amount = crate::utils::amount_or_zero(r.get(4)?);
        let nickname: Option<String> = r.get(6)?;
        let model: Option<String> = r.get(7)?;
        let bike = nickname
            .filter(|n| !n.is_empty())
            .or(model)
            .unwrap_or_default();
        data.push(ExpenseRow {
            id: r.get(0)?,
            date: r.get(1)?,
            description: r.get(2)?,
            category: r.get::<_, Option<String>>(3)?.unwrap_or_default(),
            amount: fmt_money(&amount),
            paid_by: r.get::<_, Option<String>>(5)?.unwrap_or_else(|| BUSINESS_PAYER.into()),
            bike,
        });
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.description.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.paid_by.clone(),
                    r.bike.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Description", "Category", "Amount", "Paid By", "Bike"],
                rows,
            )
        );
    }
    Ok(())
}
