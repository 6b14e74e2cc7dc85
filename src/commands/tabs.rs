// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::App;
use crate::clock::Clock;
use crate::db::KeyValueStore;
use crate::models::TabId;
use crate::prompts::Prompter;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use serde::Serialize;

pub fn handle<S: KeyValueStore, C: Clock>(
    app: &mut App<S, C>,
    m: &clap::ArgMatches,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    match m.subcommand() {
        Some(("new", sub)) => {
            let created = match sub.get_one::<String>("title") {
                Some(title) => Some(app.create_tab(title.trim())?),
                None => app.new_tab(prompter)?,
            };
            match created {
                Some(id) => println!("Created tab '{}' ({})", app.active_title(), id),
                None => println!("Cancelled"),
            }
        }
        Some(("list", sub)) => {
            let rows = tab_rows(app);
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let data = rows
                    .iter()
                    .map(|r| {
                        vec![
                            if r.active { "*".into() } else { String::new() },
                            r.id.clone(),
                            r.title.clone(),
                            r.count.to_string(),
                            r.total.clone(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["", "ID", "Title", "Expenses", "Total"], data)
                );
            }
        }
        Some(("rename", sub)) => {
            let id = TabId::from(sub.get_one::<String>("id").unwrap().as_str());
            let title = sub.get_one::<String>("title").unwrap().trim();
            app.rename_tab(&id, title)?;
            println!("Renamed {} to '{}'", id, title);
        }
        Some(("close", sub)) => {
            let id = TabId::from(sub.get_one::<String>("id").unwrap().as_str());
            app.close_tab(&id, prompter)?;
            println!("Closed {}", id);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TabRow {
    pub id: String,
    pub title: String,
    pub count: usize,
    pub total: String,
    pub active: bool,
}

pub fn tab_rows<S: KeyValueStore, C: Clock>(app: &App<S, C>) -> Vec<TabRow> {
    let store = app.store();
    store
        .tabs()
        .iter()
        .map(|t| TabRow {
            id: t.id.to_string(),
            title: t.title.clone(),
            count: t.expenses.len(),
            total: fmt_money(&store.total_for(&t.id)),
            active: &t.id == app.active_tab(),
        })
        .collect()
}
