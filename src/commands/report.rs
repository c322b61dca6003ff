// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Report-data assembly and the narrative-generation call.
//!
//! The payload is computed here from a snapshot; the narrative itself is an
//! opaque external service (Gemini). Nothing in the response is parsed
//! beyond extracting the generated text.

use crate::ledger::{self, Metrics};
use crate::models::{CapitalEntry, Expense, Snapshot};
use crate::utils::{fmt_money, http_client, load_snapshot};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const GEMINI_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";
const API_KEY_SETTING: &str = "gemini_api_key";

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("payload", _)) => {
            let snapshot = load_snapshot(conn)?;
            let data = build_report_data(&snapshot);
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Some(("ai", _)) => generate(conn)?,
        Some(("set-key", sub)) => {
            let key = sub.get_one::<String>("key").unwrap();
            crate::utils::set_setting(conn, API_KEY_SETTING, key)?;
            println!("Gemini API key stored");
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct BikeDetail {
    pub model: String,
    pub status: String,
    pub buy: Decimal,
    pub sell: Option<Decimal>,
    /// Numeric margin, or "N/A" for bikes without an applicable outcome.
    pub profit: String,
}

/// The §6 output-boundary payload: consistent summary numbers plus the raw
/// ledgers, everything the narrative service is allowed to see.
#[derive(Debug, Serialize)]
pub struct ReportData {
    pub metrics: Metrics,
    pub bikes: Vec<BikeDetail>,
    pub expenses: Vec<Expense>,
    pub capital: Vec<CapitalEntry>,
    pub partners: Vec<String>,
    pub balances: BTreeMap<String, Decimal>,
}

pub fn build_report_data(snapshot: &Snapshot) -> ReportData {
    let bikes = snapshot
        .bikes
        .iter()
        .map(|b| BikeDetail {
            model: b.model.clone(),
            status: b.status.to_string(),
            buy: b.buy_price,
            sell: b.sell_price,
            profit: ledger::profit(b, &snapshot.expenses)
                .map(|p| p.to_string())
                .unwrap_or_else(|| "N/A".into()),
        })
        .collect();
    ReportData {
        metrics: ledger::metrics(snapshot),
        bikes,
        expenses: snapshot.expenses.clone(),
        capital: snapshot.capital.clone(),
        partners: snapshot.partners.iter().map(|p| p.name.clone()).collect(),
        balances: ledger::balances(&snapshot.capital, &snapshot.partners),
    }
}

pub fn render_prompt(data: &ReportData) -> Result<String> {
    let m = &data.metrics;
    let summary = format!(
        "Business Financial Summary:\n\
         - Total Sold Bikes: {}\n\
         - Current Inventory Count: {}\n\
         - Bikes Kept for Personal Use: {}\n\
         - Gross Profit from Sales: {}\n\
         - Total General Expenses: {}\n\
         - Net Business Income: {}\n\
         - Free Cash: {}\n\
         - Inventory Value: {}\n\n\
         Bike Details: {}\n\n\
         Expenses: {}\n\n\
         Capital: {}\n\
         Bros (Partners): {}\n\
         Balances: {}",
        m.sold_count,
        m.inventory_count,
        m.kept_count,
        fmt_money(&m.gross_profit),
        fmt_money(&m.general_expenses),
        fmt_money(&m.net_profit),
        fmt_money(&m.free_cash),
        fmt_money(&m.inventory_value),
        serde_json::to_string(&data.bikes)?,
        serde_json::to_string(&data.expenses)?,
        serde_json::to_string(&data.capital)?,
        serde_json::to_string(&data.partners)?,
        serde_json::to_string(&data.balances)?,
    );

    Ok(format!(
        "You are a savvy business consultant for a small used bike flipping business run by \
         brothers (bros). Analyze the following financial data and provide a concise, \
         actionable report.\n\n\
         Note: Expenses paid by specific Bros (partners) are counted as Capital Contributions \
         for them.\n\n\
         Data:\n{summary}\n\n\
         Structure your response as follows (in Markdown):\n\
         1. **Financial Health**: Are we making money? (Mention Net Income and margins).\n\
         2. **Inventory Analysis**: Which bikes were the best/worst flips? Any red flags in \
         current inventory?\n\
         3. **Operational Advice**: specific advice based on the expenses or capital flow.\n\
         4. **The \"Ride\" Ahead**: A motivational closing sentence using bike puns.\n\n\
         Keep it professional but encouraging. If bikes were \"Kept\", mention that it's a \
         perk of the job but affects cash flow."
    ))
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: String,
}

fn api_key(conn: &Connection) -> Result<String> {
    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        if !key.is_empty() {
            return Ok(key);
        }
    }
    crate::utils::get_setting(conn, API_KEY_SETTING)?
        .context("No Gemini API key; set GEMINI_API_KEY or run 'report set-key'")
}

fn generate(conn: &Connection) -> Result<()> {
    let key = api_key(conn)?;
    let snapshot = load_snapshot(conn)?;
    let data = build_report_data(&snapshot);
    let prompt = render_prompt(&data)?;

    let body = serde_json::json!({
        "contents": [{ "parts": [{ "text": prompt }] }]
    });
    let client = http_client()?;
    let resp = client
        .post(format!("{}?key={}", GEMINI_URL, key))
        .json(&body)
        .send()?
        .error_for_status()
        .context("Gemini request failed")?;
    let parsed: GenerateResponse = resp.json().context("Unexpected Gemini response shape")?;
    let text = parsed
        .candidates
        .first()
        .and_then(|c| c.content.parts.first())
        .map(|p| p.text.as_str())
        .context("Gemini returned no candidates")?;
    println!("{}", text);
    Ok(())
}
