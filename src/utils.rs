// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

use crate::models::Expense;

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn parse_expense_id(s: &str) -> Result<i64> {
    s.trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid expense id '{}'", s))
}

fn two_dp(d: Decimal) -> String {
    format!(
        "{:.2}",
        d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("${}", two_dp(*d))
}

/// Amount as announced after a voice entry, in crore or lakh when large enough.
pub fn display_amount(d: &Decimal) -> String {
    let crore = Decimal::from(10_000_000);
    let lakh = Decimal::from(100_000);
    if *d >= crore {
        format!("{} crore", two_dp(*d / crore))
    } else if *d >= lakh {
        format!("{} lakh", two_dp(*d / lakh))
    } else {
        fmt_money(d)
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

pub fn expense_rows(expenses: &[&Expense]) -> Vec<Vec<String>> {
    expenses
        .iter()
        .map(|e| {
            vec![
                e.date.format("%Y-%m-%d %H:%M").to_string(),
                e.id.to_string(),
                e.description.clone(),
                e.category.to_string(),
                fmt_money(&e.amount),
            ]
        })
        .collect()
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
        // Arrays stream one element per line
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
