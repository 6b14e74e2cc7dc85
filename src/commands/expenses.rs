// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::App;
use crate::clock::Clock;
use crate::db::KeyValueStore;
use crate::models::{Category, Expense};
use crate::prompts::Prompter;
use crate::utils::{
    expense_rows, fmt_money, maybe_print_json, parse_decimal, parse_expense_id, pretty_table,
};
use anyhow::Result;
use serde::Serialize;

pub fn handle<S: KeyValueStore, C: Clock>(
    app: &mut App<S, C>,
    name: &str,
    m: &clap::ArgMatches,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    match name {
        "add" => {
            let amount = parse_decimal(m.get_one::<String>("amount").unwrap())?;
            let category: Category = m.get_one::<String>("category").unwrap().parse()?;
            let description = m.get_one::<String>("description").unwrap();
            let e = app.add_manual(amount, category, description)?;
            println!(
                "Added {} for {} to '{}' (id {})",
                fmt_money(&e.amount),
                e.category,
                app.active_title(),
                e.id
            );
        }
        "list" => list(app, m)?,
        "total" => println!("Total: {}", fmt_money(&app.active_total())),
        "rm" => {
            let id = parse_expense_id(m.get_one::<String>("id").unwrap())?;
            match app.delete_expense(id, prompter)? {
                Some(e) => println!(
                    "Deleted '{}' ({}); undo available",
                    e.description,
                    fmt_money(&e.amount)
                ),
                None => println!("Nothing deleted"),
            }
        }
        "undo" => match app.undo_last_delete()? {
            Some(e) => println!("Restored '{}' into '{}'", e.description, app.active_title()),
            None => println!("Nothing to undo"),
        },
        "clear" => {
            if app.clear_active_tab(prompter)? {
                if let Some(msg) = app.current_status() {
                    println!("{}", msg);
                }
            }
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ListView {
    pub tab: String,
    pub title: String,
    pub total: String,
    pub expenses: Vec<Expense>,
}

pub fn list_view<S: KeyValueStore, C: Clock>(app: &App<S, C>) -> ListView {
    ListView {
        tab: app.active_tab().to_string(),
        title: app.active_title().to_string(),
        total: fmt_money(&app.active_total()),
        expenses: app.active_expenses().into_iter().cloned().collect(),
    }
}

fn list<S: KeyValueStore, C: Clock>(app: &App<S, C>, m: &clap::ArgMatches) -> Result<()> {
    let view = list_view(app);
    // --json prints the whole view, --jsonl streams the expenses
    if maybe_print_json(m.get_flag("json"), false, &view)?
        || maybe_print_json(false, m.get_flag("jsonl"), &view.expenses)?
    {
        return Ok(());
    }
    let expenses = app.active_expenses();
    println!("{} ({})", view.title, view.tab);
    println!(
        "{}",
        pretty_table(
            &["Date", "ID", "Description", "Category", "Amount"],
            expense_rows(&expenses),
        )
    );
    println!("Total: {}", view.total);
    Ok(())
}
