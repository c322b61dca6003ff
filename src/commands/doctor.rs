// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{BUSINESS_PAYER, EXPENSE_CATEGORIES};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

/// Read-only data-quality sweep. Everything flagged here is tolerated by the
/// derivations (zeros, "not applicable", implicit balances); this is where
/// the operator actually finds out about it.
pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Expenses pointing at a bike that no longer exists. The delete path
    //    unlinks in-transaction, so these can only predate it.
    let mut stmt = conn.prepare(
        "SELECT e.id, e.bike_id FROM expenses e
         WHERE e.bike_id IS NOT NULL AND e.bike_id NOT IN (SELECT id FROM bikes)",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let bike_id: i64 = r.get(1)?;
        rows.push(vec![
            "dangling_bike_ref".into(),
            format!("expense #{} -> bike #{}", id, bike_id),
        ]);
    }

    // 2) Sold bikes with no recorded sale price (sale pending confirmation).
    let mut stmt2 = conn.prepare(
        "SELECT id, model FROM bikes
         WHERE status='Sold' AND (sell_price IS NULL OR sell_price='')",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let model: String = r.get(1)?;
        rows.push(vec![
            "sold_without_price".into(),
            format!("bike #{} '{}'", id, model),
        ]);
    }

    // 3) Negative amounts anywhere in the books.
    for (probe, sql) in [
        (
            "negative_buy_price",
            "SELECT id FROM bikes WHERE CAST(buy_price AS REAL) < 0
             UNION SELECT id FROM bikes WHERE CAST(other_costs AS REAL) < 0",
        ),
        (
            "negative_expense",
            "SELECT id FROM expenses WHERE CAST(amount AS REAL) < 0",
        ),
        (
            "negative_capital",
            "SELECT id FROM capital WHERE CAST(amount AS REAL) < 0",
        ),
    ] {
        let mut st = conn.prepare(sql)?;
        let mut c = st.query([])?;
        while let Some(r) = c.next()? {
            let id: i64 = r.get(0)?;
            rows.push(vec![probe.into(), format!("#{}", id)]);
        }
    }

    // 4) Capital entries or expense payers naming someone off the roster
    //    (deleted partner, or a typo opening a phantom balance).
    let mut stmt3 = conn.prepare(
        "SELECT DISTINCT partner_name FROM capital
         WHERE partner_name NOT IN (SELECT name FROM partners)",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let name: String = r.get(0)?;
        rows.push(vec!["capital_unknown_partner".into(), name]);
    }
    let mut stmt4 = conn.prepare(
        "SELECT DISTINCT paid_by FROM expenses
         WHERE paid_by != ?1 AND paid_by NOT IN (SELECT name FROM partners)",
    )?;
    let mut cur4 = stmt4.query([BUSINESS_PAYER])?;
    while let Some(r) = cur4.next()? {
        let name: String = r.get(0)?;
        rows.push(vec!["expense_unknown_payer".into(), name]);
    }

    // 5) Off-roster categories.
    let placeholders = vec!["?"; EXPENSE_CATEGORIES.len()].join(",");
    let sql = format!(
        "SELECT DISTINCT category FROM expenses WHERE category NOT IN ({})",
        placeholders
    );
    let mut stmt5 = conn.prepare(&sql)?;
    let mut cur5 = stmt5.query(rusqlite::params_from_iter(EXPENSE_CATEGORIES.iter()))?;
    while let Some(r) = cur5.next()? {
        let cat: String = r.get(0)?;
        rows.push(vec!["unknown_category".into(), cat]);
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
