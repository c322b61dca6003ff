// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use flipledger::commands::expenses::{self, NewExpense};
use flipledger::{db, ledger, utils};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute("INSERT INTO partners(name) VALUES ('Alex')", [])
        .unwrap();
    conn
}

fn new_expense(paid_by: &str, amount: &str, bike_id: Option<i64>) -> NewExpense {
    NewExpense {
        date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        description: "spray paint".into(),
        category: "Tools".into(),
        amount: amount.parse().unwrap(),
        paid_by: paid_by.into(),
        bike_id,
    }
}

#[test]
fn business_paid_expense_creates_no_capital_entry() {
    let mut conn = setup();
    expenses::record(&mut conn, &new_expense("Business", "45", None)).unwrap();
    let caps: i64 = conn
        .query_row("SELECT COUNT(*) FROM capital", [], |r| r.get(0))
        .unwrap();
    assert_eq!(caps, 0);
}

#[test]
fn partner_paid_expense_books_matching_contribution() {
    let mut conn = setup();
    expenses::record(&mut conn, &new_expense("Alex", "50", None)).unwrap();

    let (partner, kind, amount, date, desc): (String, String, String, String, String) = conn
        .query_row(
            "SELECT partner_name, type, amount, date, description FROM capital",
            [],
            |r| {
                Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?))
            },
        )
        .unwrap();
    assert_eq!(partner, "Alex");
    assert_eq!(kind, "Contribution");
    assert_eq!(amount, "50");
    assert_eq!(date, "2025-07-01");
    assert_eq!(desc, "Expense: spray paint");
}

#[test]
fn scenario_d_balance_after_auto_contribution() {
    let mut conn = setup();
    conn.execute(
        "INSERT INTO capital(partner_name, type, amount, date) VALUES ('Alex','Contribution','1000','2025-06-01')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO capital(partner_name, type, amount, date) VALUES ('Alex','Withdrawal','200','2025-06-15')",
        [],
    )
    .unwrap();
    expenses::record(&mut conn, &new_expense("Alex", "50", None)).unwrap();

    let snapshot = utils::load_snapshot(&conn).unwrap();
    let balances = ledger::balances(&snapshot.capital, &snapshot.partners);
    assert_eq!(balances["Alex"], Decimal::from(850));
}

#[test]
fn linked_expense_requires_existing_bike() {
    let mut conn = setup();
    let err = expenses::record(&mut conn, &new_expense("Business", "20", Some(7)));
    assert!(err.is_err());
    // Nothing half-written.
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM expenses", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);
}

#[test]
fn linked_expense_rolls_into_bike_cost() {
    let mut conn = setup();
    conn.execute(
        "INSERT INTO bikes(model, buy_date, buy_price, other_costs) VALUES ('Cannondale','2025-06-20','500','50')",
        [],
    )
    .unwrap();
    let bike_id = conn.last_insert_rowid();
    expenses::record(&mut conn, &new_expense("Business", "100", Some(bike_id))).unwrap();

    let snapshot = utils::load_snapshot(&conn).unwrap();
    let bike = &snapshot.bikes[0];
    assert_eq!(
        ledger::total_cost(bike, &snapshot.expenses),
        Decimal::from(650)
    );
}
