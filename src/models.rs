// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Payer sentinel for expenses covered by the business itself rather than a
/// partner. Any other payer string is treated as a partner name.
pub const BUSINESS_PAYER: &str = "Business";

/// Category roster carried over from the historical books. Off-roster
/// categories are accepted; `doctor` flags them.
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "General",
    "Marketing",
    "Tools",
    "Rent",
    "Transport",
    "Utilities",
    "Software",
    "Other",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BikeStatus {
    #[serde(rename = "In Inventory")]
    InInventory,
    Sold,
    Kept,
}

impl BikeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BikeStatus::InInventory => "In Inventory",
            BikeStatus::Sold => "Sold",
            BikeStatus::Kept => "Kept",
        }
    }
}

impl fmt::Display for BikeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown bike status '{0}', expected 'In Inventory', 'Sold' or 'Kept'")]
pub struct ParseBikeStatusError(String);

impl FromStr for BikeStatus {
    type Err = ParseBikeStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', " ").as_str() {
            "in inventory" | "inventory" => Ok(BikeStatus::InInventory),
            "sold" => Ok(BikeStatus::Sold),
            "kept" => Ok(BikeStatus::Kept),
            _ => Err(ParseBikeStatusError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapitalType {
    Contribution,
    Withdrawal,
}

impl CapitalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapitalType::Contribution => "Contribution",
            CapitalType::Withdrawal => "Withdrawal",
        }
    }
}

impl fmt::Display for CapitalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown capital entry type '{0}', expected 'Contribution' or 'Withdrawal'")]
pub struct ParseCapitalTypeError(String);

impl FromStr for CapitalType {
    type Err = ParseCapitalTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "contribution" | "in" => Ok(CapitalType::Contribution),
            "withdrawal" | "out" => Ok(CapitalType::Withdrawal),
            _ => Err(ParseCapitalTypeError(s.to_string())),
        }
    }
}

/// One inventory unit. `sell_price`/`sell_date` carry meaning only while
/// `status == Sold`; a Sold bike without a price is a sale pending
/// confirmation, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bike {
    pub id: i64,
    pub model: String,
    pub nickname: Option<String>,
    pub status: BikeStatus,
    pub buy_date: NaiveDate,
    pub buy_price: Decimal,
    pub other_costs: Decimal,
    pub sell_date: Option<NaiveDate>,
    pub sell_price: Option<Decimal>,
    pub notes: Option<String>,
}

impl Bike {
    /// Nickname if one was given, otherwise the model name.
    pub fn label(&self) -> &str {
        match self.nickname.as_deref() {
            Some(n) if !n.is_empty() => n,
            _ => &self.model,
        }
    }
}

/// A cost event. With a `bike_id` it rolls into that bike's total cost;
/// without one it books as a general business expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub paid_by: String,
    pub bike_id: Option<i64>,
}

impl Expense {
    pub fn is_general(&self) -> bool {
        self.bike_id.is_none()
    }
}

/// A capital movement between the business and a partner. Linked to the
/// partner by display name, not id (denormalized by design; renames do not
/// rewrite history unless explicitly migrated).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalEntry {
    pub id: i64,
    pub partner_name: String,
    pub kind: CapitalType,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    pub id: i64,
    pub name: String,
}

/// Point-in-time copy of the whole ledger. The derivation core only ever
/// reads one of these; it never talks to storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub bikes: Vec<Bike>,
    pub expenses: Vec<Expense>,
    pub capital: Vec<CapitalEntry>,
    pub partners: Vec<Partner>,
}
