// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use flipledger::ledger;
use flipledger::models::{
    Bike, BikeStatus, CapitalEntry, CapitalType, Expense, Snapshot,
};
use rust_decimal::Decimal;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn bike(id: i64, status: BikeStatus, buy: &str, other: &str, sell: Option<&str>) -> Bike {
    Bike {
        id,
        model: format!("Giant {}", id),
        nickname: None,
        status,
        buy_date: d("2025-03-01"),
        buy_price: dec(buy),
        other_costs: dec(other),
        sell_date: sell.map(|_| d("2025-04-01")),
        sell_price: sell.map(dec),
        notes: None,
    }
}

fn expense(id: i64, bike_id: Option<i64>, amount: &str) -> Expense {
    Expense {
        id,
        date: d("2025-03-05"),
        description: format!("expense {}", id),
        category: "General".into(),
        amount: dec(amount),
        paid_by: "Business".into(),
        bike_id,
    }
}

fn capital(id: i64, partner: &str, kind: CapitalType, amount: &str) -> CapitalEntry {
    CapitalEntry {
        id,
        partner_name: partner.into(),
        kind,
        amount: dec(amount),
        date: d("2025-03-01"),
        description: None,
    }
}

#[test]
fn kept_bike_books_as_internal_sale_at_cost() {
    let snapshot = Snapshot {
        bikes: vec![bike(1, BikeStatus::Kept, "500", "50", None)],
        ..Default::default()
    };
    let m = ledger::metrics(&snapshot);
    assert_eq!(m.total_revenue, dec("550"));
    assert_eq!(m.total_cogs, dec("550"));
    assert_eq!(m.gross_profit, Decimal::ZERO);
    assert_eq!(m.net_profit, Decimal::ZERO);
    assert_eq!(m.kept_count, 1);
}

#[test]
fn general_vs_linked_expense_hit_different_lines() {
    // Linked: the 100 rolls into COGS via the bike's cost.
    let linked = Snapshot {
        bikes: vec![bike(1, BikeStatus::Sold, "500", "50", Some("700"))],
        expenses: vec![expense(1, Some(1), "100")],
        ..Default::default()
    };
    let m = ledger::metrics(&linked);
    assert_eq!(m.total_cogs, dec("650"));
    assert_eq!(m.general_expenses, Decimal::ZERO);
    assert_eq!(m.net_profit, dec("50"));

    // General: same 100 lands under general expenses instead.
    let general = Snapshot {
        bikes: vec![bike(1, BikeStatus::Sold, "500", "50", Some("700"))],
        expenses: vec![expense(1, None, "100")],
        ..Default::default()
    };
    let m = ledger::metrics(&general);
    assert_eq!(m.total_cogs, dec("550"));
    assert_eq!(m.general_expenses, dec("100"));
    assert_eq!(m.net_profit, dec("50"));

    // Either way the money left the till once, never twice.
    assert_eq!(
        ledger::metrics(&linked).free_cash,
        ledger::metrics(&general).free_cash
    );
}

#[test]
fn inventory_value_counts_only_unsold_stock() {
    let snapshot = Snapshot {
        bikes: vec![
            bike(1, BikeStatus::InInventory, "300", "20", None),
            bike(2, BikeStatus::Sold, "400", "0", Some("600")),
            bike(3, BikeStatus::Kept, "100", "0", None),
        ],
        expenses: vec![expense(1, Some(1), "30")],
        ..Default::default()
    };
    let m = ledger::metrics(&snapshot);
    assert_eq!(m.inventory_value, dec("350"));
    assert_eq!(m.sold_count, 1);
    assert_eq!(m.inventory_count, 1);
    assert_eq!(m.kept_count, 1);
}

#[test]
fn partner_funded_expense_is_cash_neutral() {
    // A bro fronts a 50 general expense: books as +50 capital and +50
    // expense. Net profit drops, free cash does not move.
    let before = Snapshot {
        bikes: vec![bike(1, BikeStatus::Sold, "500", "0", Some("700"))],
        capital: vec![capital(1, "Alex", CapitalType::Contribution, "1000")],
        ..Default::default()
    };
    let mut after = before.clone();
    after.expenses.push(Expense {
        paid_by: "Alex".into(),
        ..expense(1, None, "50")
    });
    after
        .capital
        .push(capital(2, "Alex", CapitalType::Contribution, "50"));

    let mb = ledger::metrics(&before);
    let ma = ledger::metrics(&after);
    assert_eq!(ma.free_cash, mb.free_cash);
    assert_eq!(ma.net_profit, mb.net_profit - dec("50"));
}

#[test]
fn sold_without_price_contributes_cost_but_no_revenue() {
    let snapshot = Snapshot {
        bikes: vec![bike(1, BikeStatus::Sold, "500", "50", None)],
        ..Default::default()
    };
    let m = ledger::metrics(&snapshot);
    assert_eq!(m.total_revenue, Decimal::ZERO);
    assert_eq!(m.total_cogs, dec("550"));
    assert_eq!(m.net_profit, dec("-550"));
    assert_eq!(m.sold_count, 1);
}

#[test]
fn kept_to_sold_at_cost_is_invisible() {
    // The break-even modeling: flipping Kept to Sold at exactly total cost
    // must not move net profit or free cash.
    let kept = Snapshot {
        bikes: vec![bike(1, BikeStatus::Kept, "500", "50", None)],
        expenses: vec![expense(1, Some(1), "25"), expense(2, None, "10")],
        capital: vec![capital(1, "Sam", CapitalType::Contribution, "800")],
        ..Default::default()
    };
    let cost = ledger::total_cost(&kept.bikes[0], &kept.expenses);

    let mut sold = kept.clone();
    sold.bikes[0].status = BikeStatus::Sold;
    sold.bikes[0].sell_price = Some(cost);
    sold.bikes[0].sell_date = Some(d("2025-05-01"));

    let mk = ledger::metrics(&kept);
    let ms = ledger::metrics(&sold);
    assert_eq!(mk.net_profit, ms.net_profit);
    assert_eq!(mk.free_cash, ms.free_cash);
}

#[test]
fn keeping_a_bike_leaves_free_cash_unchanged() {
    let inventory = Snapshot {
        bikes: vec![bike(1, BikeStatus::InInventory, "500", "50", None)],
        capital: vec![capital(1, "Sam", CapitalType::Contribution, "1000")],
        ..Default::default()
    };
    let mut kept = inventory.clone();
    kept.bikes[0].status = BikeStatus::Kept;

    assert_eq!(
        ledger::metrics(&inventory).free_cash,
        ledger::metrics(&kept).free_cash
    );
}

#[test]
fn dangling_expense_falls_back_to_general() {
    // Bike 99 is gone; the expense still spends real money, so it books as
    // general instead of disappearing.
    let snapshot = Snapshot {
        bikes: vec![bike(1, BikeStatus::Sold, "500", "0", Some("700"))],
        expenses: vec![expense(1, Some(99), "75")],
        ..Default::default()
    };
    let m = ledger::metrics(&snapshot);
    assert_eq!(m.general_expenses, dec("75"));
    assert_eq!(m.net_profit, dec("125"));
}

#[test]
fn free_cash_worked_example() {
    // 1000 in, 200 out, one bike bought 500 and sold 700, 100 general spend:
    // 800 + 700 - 500 - 100 = 900.
    let snapshot = Snapshot {
        bikes: vec![bike(1, BikeStatus::Sold, "500", "0", Some("700"))],
        expenses: vec![expense(1, None, "100")],
        capital: vec![
            capital(1, "Alex", CapitalType::Contribution, "1000"),
            capital(2, "Alex", CapitalType::Withdrawal, "200"),
        ],
        ..Default::default()
    };
    let m = ledger::metrics(&snapshot);
    assert_eq!(m.net_capital, dec("800"));
    assert_eq!(m.free_cash, dec("900"));
}

#[test]
fn empty_snapshot_is_all_zeros() {
    let m = ledger::metrics(&Snapshot::default());
    assert_eq!(m.net_profit, Decimal::ZERO);
    assert_eq!(m.free_cash, Decimal::ZERO);
    assert_eq!(m.inventory_value, Decimal::ZERO);
    assert_eq!(m.sold_count + m.inventory_count + m.kept_count, 0);
}
