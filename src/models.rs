// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

pub const FALLBACK_DESCRIPTION: &str = "Voice expense";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Transport,
    Utilities,
    Entertainment,
    #[default]
    Other,
}

impl Category {
    /// Keyword matching order. The first keyword found in a transcript wins.
    pub const ORDERED: [Category; 5] = [
        Category::Food,
        Category::Transport,
        Category::Utilities,
        Category::Entertainment,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Utilities => "utilities",
            Category::Entertainment => "entertainment",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Category::ORDERED
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                anyhow!(
                    "Unknown category '{}' (use food|transport|utilities|entertainment|other)",
                    s.trim()
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(String);

impl TabId {
    pub fn from_counter(n: u32) -> Self {
        TabId(format!("tab{}", n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TabId {
    fn from(s: &str) -> Self {
        TabId(s.trim().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedExpense {
    pub description: String,
    pub amount: Decimal,
    pub category: Category,
}

impl ParsedExpense {
    pub fn description_or_default(&self) -> &str {
        if self.description.is_empty() {
            FALLBACK_DESCRIPTION
        } else {
            &self.description
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default)]
    pub category: Category,
    #[serde(with = "iso_millis")]
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TabSnapshot {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_expenses")]
    pub expenses: Vec<Expense>,
}

/// Decodes stored records one by one, dropping the ones that cannot be read.
pub fn expenses_from_values(values: Vec<serde_json::Value>) -> Vec<Expense> {
    values
        .into_iter()
        .filter_map(|v| match serde_json::from_value::<Expense>(v) {
            Ok(e) => Some(e),
            Err(err) => {
                warn!("skipping unreadable expense record: {}", err);
                None
            }
        })
        .collect()
}

fn lenient_expenses<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Expense>, D::Error> {
    let raw = Option::<Vec<serde_json::Value>>::deserialize(d)?;
    Ok(expenses_from_values(raw.unwrap_or_default()))
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerSnapshot {
    pub tabs: Vec<TabSnapshot>,
}

impl LedgerSnapshot {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// Timestamps are written the way browsers print them: UTC, milliseconds, `Z`.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn expense_serializes_like_a_browser_record() {
        let e = Expense {
            id: 1_722_507_330_123,
            description: "dollars for".into(),
            amount: Decimal::new(30, 0),
            category: Category::Food,
            date: Utc.timestamp_millis_opt(1_722_507_330_123).unwrap(),
        };
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["category"], "food");
        assert_eq!(v["date"], "2024-08-01T10:15:30.123Z");
        assert_eq!(v["amount"].as_f64(), Some(30.0));
    }

    #[test]
    fn category_from_str_is_forgiving_about_case() {
        assert_eq!(" Transport ".parse::<Category>().unwrap(), Category::Transport);
        assert!("groceries".parse::<Category>().is_err());
    }

    #[test]
    fn snapshot_keeps_readable_records_and_defaults_missing_fields() {
        let raw = r#"[{"title":"Trip","expenses":[
            {"id":1,"description":"taxi","amount":12,"date":"2024-08-01T10:15:30.123Z"},
            {"id":2,"description":"broken","category":"food"},
            {"id":3,"amount":4.5,"category":"food","date":"2024-08-01T10:15:31.000Z"}
        ]}]"#;
        let snap = LedgerSnapshot::from_json(raw).unwrap();
        let expenses = &snap.tabs[0].expenses;
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].category, Category::Other);
        assert_eq!(expenses[1].description, "");
    }
}
