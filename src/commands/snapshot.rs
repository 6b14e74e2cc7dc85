// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::App;
use crate::clock::Clock;
use crate::db::KeyValueStore;
use crate::models::LedgerSnapshot;
use anyhow::{Context, Result, bail};
use chrono::SecondsFormat;
use std::path::Path;

pub fn handle<S: KeyValueStore, C: Clock>(
    app: &mut App<S, C>,
    name: &str,
    m: &clap::ArgMatches,
) -> Result<()> {
    match name {
        "export" => {
            let fmt = m.get_one::<String>("format").unwrap().to_lowercase();
            let out = m.get_one::<String>("out").unwrap();
            export(app, &fmt, Path::new(out))?;
            println!("Exported ledger to {}", out);
        }
        "import" => {
            let file = m.get_one::<String>("file").unwrap();
            let n = import(app, Path::new(file))?;
            println!("Imported {} tab(s) from {}", n, file);
        }
        _ => {}
    }
    Ok(())
}

pub fn export<S: KeyValueStore, C: Clock>(app: &App<S, C>, fmt: &str, out: &Path) -> Result<()> {
    let snap = app.export_snapshot();
    match fmt {
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&snap)?)
                .with_context(|| format!("Write {}", out.display()))?;
        }
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["tab", "id", "date", "description", "category", "amount"])?;
            for tab in &snap.tabs {
                for e in &tab.expenses {
                    wtr.write_record([
                        tab.title.clone(),
                        e.id.to_string(),
                        e.date.to_rfc3339_opts(SecondsFormat::Millis, true),
                        e.description.clone(),
                        e.category.to_string(),
                        e.amount.to_string(),
                    ])?;
                }
            }
            wtr.flush()?;
        }
        other => bail!("Unknown format: {} (use json|csv)", other),
    }
    Ok(())
}

/// Replaces the whole ledger with the snapshot in `file`. Returns the tab count.
pub fn import<S: KeyValueStore, C: Clock>(app: &mut App<S, C>, file: &Path) -> Result<usize> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Read {}", file.display()))?;
    let snap = LedgerSnapshot::from_json(&raw)
        .with_context(|| format!("Invalid ledger snapshot in {}", file.display()))?;
    app.import_snapshot(snap)?;
    Ok(app.store().tabs().len())
}
