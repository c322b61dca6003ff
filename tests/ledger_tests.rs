// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use flipledger::ledger;
use flipledger::models::{Bike, BikeStatus, Expense};
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
        model: format!("Trek {}", id),
        nickname: None,
        status,
        buy_date: d("2025-01-10"),
        buy_price: dec(buy),
        other_costs: dec(other),
        sell_date: sell.map(|_| d("2025-02-01")),
        sell_price: sell.map(dec),
        notes: None,
    }
}

fn expense(id: i64, bike_id: Option<i64>, amount: &str) -> Expense {
    Expense {
        id,
        date: d("2025-01-15"),
        description: format!("expense {}", id),
        category: "Tools".into(),
        amount: dec(amount),
        paid_by: "Business".into(),
        bike_id,
    }
}

#[test]
fn total_cost_without_linked_expenses() {
    let b = bike(1, BikeStatus::InInventory, "500", "50", None);
    assert_eq!(ledger::total_cost(&b, &[]), dec("550"));
}

#[test]
fn total_cost_includes_only_linked_expenses() {
    let b = bike(1, BikeStatus::InInventory, "500", "50", None);
    let expenses = vec![
        expense(1, Some(1), "100"),
        expense(2, Some(2), "40"),
        expense(3, None, "25"),
    ];
    assert_eq!(ledger::total_cost(&b, &expenses), dec("650"));
}

#[test]
fn scenario_a_sold_bike() {
    // buy 500 + other 50, sold at 700 -> cost 550, profit 150
    let b = bike(1, BikeStatus::Sold, "500", "50", Some("700"));
    assert_eq!(ledger::total_cost(&b, &[]), dec("550"));
    assert_eq!(ledger::profit(&b, &[]), Some(dec("150")));
}

#[test]
fn scenario_b_kept_bike_breaks_even() {
    let b = bike(1, BikeStatus::Kept, "500", "50", None);
    assert_eq!(ledger::total_cost(&b, &[]), dec("550"));
    assert_eq!(ledger::profit(&b, &[]), Some(Decimal::ZERO));
}

#[test]
fn scenario_c_linked_expense_moves_profit() {
    let b = bike(1, BikeStatus::Sold, "500", "50", Some("700"));
    let expenses = vec![expense(1, Some(1), "100")];
    assert_eq!(ledger::total_cost(&b, &expenses), dec("650"));
    assert_eq!(ledger::profit(&b, &expenses), Some(dec("50")));
}

#[test]
fn inventory_profit_is_not_applicable() {
    let b = bike(1, BikeStatus::InInventory, "500", "50", None);
    assert_eq!(ledger::profit(&b, &[]), None);
}

#[test]
fn sold_without_price_is_not_applicable_not_zero() {
    // Sale pending confirmation: distinct from the Kept bike's defined $0.
    let b = bike(1, BikeStatus::Sold, "500", "50", None);
    assert_eq!(ledger::profit(&b, &[]), None);
}

#[test]
fn selling_below_cost_goes_negative() {
    let b = bike(1, BikeStatus::Sold, "500", "50", Some("300"));
    assert_eq!(ledger::profit(&b, &[]), Some(dec("-250")));
}

#[test]
fn dangling_expense_does_not_roll_into_any_bike() {
    let b = bike(1, BikeStatus::InInventory, "500", "50", None);
    // Expense points at bike 99 which does not exist.
    let expenses = vec![expense(1, Some(99), "75")];
    assert_eq!(ledger::total_cost(&b, &expenses), dec("550"));
}

#[test]
fn kept_profit_ignores_stale_sell_price() {
    // Even if a sale price lingers on a Kept bike, the policy is break-even.
    let mut b = bike(1, BikeStatus::Kept, "500", "50", None);
    b.sell_price = Some(dec("900"));
    assert_eq!(ledger::profit(&b, &[]), Some(Decimal::ZERO));
}
