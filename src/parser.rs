// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{Category, ParsedExpense};

const LAKH: i64 = 100_000;
const CRORE: i64 = 10_000_000;

static LAKH_AMOUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]+)\s*lakh").unwrap());
static CRORE_AMOUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]+)\s*crore").unwrap());
static PLAIN_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?([0-9]+(?:\.[0-9]{1,2})?)").unwrap());
static LAKH_PHRASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+\s*lakh").unwrap());
static CRORE_PHRASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+\s*crore").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Could not detect amount. Please try again.")]
    NoAmountDetected,
}

pub fn parse_transcript(transcript: &str) -> Result<ParsedExpense, ParseError> {
    let lower = transcript.to_lowercase();

    let amount = detect_amount(&lower).filter(|a| !a.is_zero());
    let category = detect_category(&lower);
    let description = strip_description(&lower, category);

    match amount {
        Some(amount) => {
            debug!(
                "parsed transcript {:?}: amount={} category={} description={:?}",
                transcript, amount, category, description
            );
            Ok(ParsedExpense {
                description,
                amount,
                category,
            })
        }
        None => {
            debug!("no amount in transcript {:?}", transcript);
            Err(ParseError::NoAmountDetected)
        }
    }
}

fn detect_amount(lower: &str) -> Option<Decimal> {
    if lower.contains("lakh") {
        scaled(&LAKH_AMOUNT, lower, LAKH)
    } else if lower.contains("crore") {
        scaled(&CRORE_AMOUNT, lower, CRORE)
    } else {
        let caps = PLAIN_AMOUNT.captures(lower)?;
        caps[1].parse::<Decimal>().ok()
    }
}

fn scaled(re: &Regex, lower: &str, factor: i64) -> Option<Decimal> {
    let caps = re.captures(lower)?;
    let n = caps[1].parse::<Decimal>().ok()?;
    n.checked_mul(Decimal::from(factor))
}

pub fn detect_category(lower: &str) -> Category {
    Category::ORDERED
        .into_iter()
        .find(|c| lower.contains(c.as_str()))
        .unwrap_or_default()
}

// The plain-number strip always runs first, even for lakh/crore transcripts.
fn strip_description(lower: &str, category: Category) -> String {
    let s = PLAIN_AMOUNT.replace(lower, "");
    let s = LAKH_PHRASE.replace(&s, "");
    let s = CRORE_PHRASE.replace(&s, "");
    s.replacen(category.as_str(), "", 1).trim().to_string()
}
