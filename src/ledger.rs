// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derivation core: turns a ledger [`Snapshot`] into reported numbers.
//!
//! Everything here is a pure function over an immutable snapshot. Two
//! accounting views are produced side by side and must reconcile: the accrual
//! view (profit-and-loss, where a Kept bike books as an internal sale at
//! cost) and the cash view (free cash, where capital in/out and every bike's
//! full cost move the balance). Collapsing them into one number would lose
//! the cases where they diverge, e.g. a partner personally fronting an
//! expense or a bike being kept instead of sold.

use crate::models::{Bike, BikeStatus, CapitalEntry, CapitalType, Expense, Partner, Snapshot};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Fully-loaded cost of one bike: purchase price, incidental costs, plus
/// every expense linked to it. Amounts are taken as recorded and never
/// clamped; a negative result means bad data, which is the caller's problem
/// to surface, not ours to hide.
pub fn total_cost(bike: &Bike, all_expenses: &[Expense]) -> Decimal {
    let linked: Decimal = all_expenses
        .iter()
        .filter(|e| e.bike_id == Some(bike.id))
        .map(|e| e.amount)
        .sum();
    bike.buy_price + bike.other_costs + linked
}

/// Financial outcome of one bike.
///
/// - Sold with a recorded price: sale price minus total cost.
/// - Kept: exactly zero. A kept bike is modeled as an internal sale at cost,
///   break-even by definition.
/// - Still in inventory, or Sold with the price not yet recorded: `None`.
///   Callers must render this as "not applicable", never as $0.
pub fn profit(bike: &Bike, all_expenses: &[Expense]) -> Option<Decimal> {
    match bike.status {
        BikeStatus::Sold => bike.sell_price.map(|p| p - total_cost(bike, all_expenses)),
        BikeStatus::Kept => Some(Decimal::ZERO),
        BikeStatus::InInventory => None,
    }
}

/// The dashboard KPI record (the crate's output boundary).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metrics {
    // Accrual view
    pub total_revenue: Decimal,
    pub total_cogs: Decimal,
    pub gross_profit: Decimal,
    pub general_expenses: Decimal,
    pub net_profit: Decimal,
    pub inventory_value: Decimal,
    // Cash view
    pub net_capital: Decimal,
    pub total_bike_outflow: Decimal,
    pub free_cash: Decimal,
    // Counts
    pub sold_count: usize,
    pub inventory_count: usize,
    pub kept_count: usize,
}

/// Aggregate the whole snapshot into dashboard KPIs.
///
/// Expenses linked to a bike are already inside that bike's `total_cost` and
/// must not be counted again as general expenses. An expense whose link
/// dangles (the bike was deleted out from under it) matches no bike during
/// cost roll-up and falls into the general bucket instead of vanishing. A
/// Sold bike whose price is still unrecorded contributes its cost to COGS
/// and outflow but nothing to revenue.
pub fn metrics(snapshot: &Snapshot) -> Metrics {
    let mut total_revenue = Decimal::ZERO;
    let mut total_cogs = Decimal::ZERO;
    let mut inventory_value = Decimal::ZERO;
    let mut total_bike_outflow = Decimal::ZERO;
    let mut sold_count = 0usize;
    let mut inventory_count = 0usize;
    let mut kept_count = 0usize;

    for bike in &snapshot.bikes {
        let cost = total_cost(bike, &snapshot.expenses);
        total_bike_outflow += cost;
        match bike.status {
            BikeStatus::Sold => {
                sold_count += 1;
                total_revenue += bike.sell_price.unwrap_or(Decimal::ZERO);
                total_cogs += cost;
            }
            BikeStatus::Kept => {
                // Imputed revenue equal to cost: the break-even booking.
                kept_count += 1;
                total_revenue += cost;
                total_cogs += cost;
            }
            BikeStatus::InInventory => {
                inventory_count += 1;
                inventory_value += cost;
            }
        }
    }

    let bike_ids: std::collections::HashSet<i64> =
        snapshot.bikes.iter().map(|b| b.id).collect();
    let general_expenses: Decimal = snapshot
        .expenses
        .iter()
        .filter(|e| e.bike_id.is_none_or(|id| !bike_ids.contains(&id)))
        .map(|e| e.amount)
        .sum();

    let net_capital: Decimal = snapshot
        .capital
        .iter()
        .map(|c| match c.kind {
            CapitalType::Contribution => c.amount,
            CapitalType::Withdrawal => -c.amount,
        })
        .sum();

    let gross_profit = total_revenue - total_cogs;
    let net_profit = gross_profit - general_expenses;
    let free_cash = net_capital + total_revenue - total_bike_outflow - general_expenses;

    Metrics {
        total_revenue,
        total_cogs,
        gross_profit,
        general_expenses,
        net_profit,
        inventory_value,
        net_capital,
        total_bike_outflow,
        free_cash,
        sold_count,
        inventory_count,
        kept_count,
    }
}

/// Running balance per partner over the full capital history.
///
/// Every partner on the roster starts at zero so inactive partners still
/// show up. Entries naming a partner not on the roster (deleted partner, or
/// a typo in the books) start tracking implicitly at zero rather than being
/// dropped. Matching is purely by name string.
pub fn balances(
    all_capital: &[CapitalEntry],
    all_partners: &[Partner],
) -> BTreeMap<String, Decimal> {
    let mut out: BTreeMap<String, Decimal> = BTreeMap::new();
    for p in all_partners {
        out.insert(p.name.clone(), Decimal::ZERO);
    }
    for entry in all_capital {
        let bal = out.entry(entry.partner_name.clone()).or_default();
        match entry.kind {
            CapitalType::Contribution => *bal += entry.amount,
            CapitalType::Withdrawal => *bal -= entry.amount,
        }
    }
    out
}
