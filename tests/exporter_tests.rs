// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use flipledger::{cli, commands::exporter, db};
use rusqlite::Connection;
use tempfile::tempdir;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO bikes(model, nickname, status, buy_date, buy_price, other_costs, sell_date, sell_price)
         VALUES ('Trek 820','Rusty','Sold','2025-01-10','500','50','2025-02-01','700')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO expenses(date, description, category, amount, paid_by, bike_id)
         VALUES ('2025-01-12','new tires','Tools','80','Alex',1)",
        [],
    )
    .unwrap();
    conn
}

fn run_export(conn: &Connection, args: &[&str]) {
    let matches = cli::build_cli().get_matches_from(args);
    if let Some(("export", sub)) = matches.subcommand() {
        exporter::handle(conn, sub).unwrap();
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_bikes_csv() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("bikes.csv");
    run_export(
        &conn,
        &["flipledger", "export", "bikes", "--out", out.to_str().unwrap()],
    );

    let content = std::fs::read_to_string(&out).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next().unwrap(),
        "model,nickname,status,buy_date,buy_price,other_costs,sell_date,sell_price,notes"
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("Trek 820,Rusty,Sold,2025-01-10,500,50"));
}

#[test]
fn export_expenses_json() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("expenses.json");
    run_export(
        &conn,
        &[
            "flipledger",
            "export",
            "expenses",
            "--format",
            "json",
            "--out",
            out.to_str().unwrap(),
        ],
    );

    let content = std::fs::read_to_string(&out).unwrap();
    let items: serde_json::Value = serde_json::from_str(&content).unwrap();
    let arr = items.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["description"], "new tires");
    assert_eq!(arr[0]["bike"], "Trek 820");
    assert_eq!(arr[0]["paid_by"], "Alex");
}

#[test]
fn export_capital_csv_header_only_when_empty() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("capital.csv");
    run_export(
        &conn,
        &["flipledger", "export", "capital", "--out", out.to_str().unwrap()],
    );

    let content = std::fs::read_to_string(&out).unwrap();
    assert_eq!(content.trim(), "date,partner,type,amount,description");
}
