// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, TimeZone, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use voxledger::app::{App, FIRST_TAB_PROMPT};
use voxledger::clock::SteppingClock;
use voxledger::config::Config;
use voxledger::db::{KeyValueStore, LEGACY_EXPENSES_KEY, SqliteStore, TABS_KEY, UNREADABLE_TABS_KEY};
use voxledger::models::{Category, LedgerSnapshot, TabId};
use voxledger::prompts::{AssumeYes, ScriptedPrompter};

fn clock() -> SteppingClock {
    SteppingClock::new(
        Utc.with_ymd_and_hms(2025, 8, 1, 9, 0, 0).unwrap(),
        Duration::milliseconds(1),
    )
}

fn store() -> SqliteStore {
    SqliteStore::new(Connection::open_in_memory().unwrap()).unwrap()
}

fn setup() -> App<SqliteStore, SteppingClock> {
    App::load(store(), clock(), Config::default(), &mut AssumeYes).unwrap()
}

fn saved(app: &App<SqliteStore, SteppingClock>) -> LedgerSnapshot {
    let raw = app.storage().load(TABS_KEY).unwrap().unwrap();
    LedgerSnapshot::from_json(&raw).unwrap()
}

#[test]
fn first_load_creates_and_saves_a_default_tab() {
    let app = setup();
    assert_eq!(app.active_tab().as_str(), "tab1");
    assert_eq!(app.active_title(), "Expenses");
    let snap = saved(&app);
    assert_eq!(snap.tabs.len(), 1);
    assert_eq!(snap.tabs[0].title, "Expenses");
}

#[test]
fn transcript_adds_to_active_tab_and_updates_total() {
    let mut app = setup();
    let e = app.record_transcript("30 dollars for food").unwrap().unwrap();
    assert_eq!(e.amount, Decimal::from(30));
    assert_eq!(e.category, Category::Food);
    assert_eq!(e.description, "dollars for");
    assert_eq!(app.active_total(), Decimal::from(30));
    assert_eq!(app.current_status(), Some("Added: $30.00 for food"));
    assert_eq!(saved(&app).tabs[0].expenses, vec![e]);
}

#[test]
fn bare_amount_gets_the_fallback_description() {
    let mut app = setup();
    let e = app.record_transcript("15 transport").unwrap().unwrap();
    assert_eq!(e.description, "Voice expense");
}

#[test]
fn lakh_entry_is_announced_in_lakh() {
    let mut app = setup();
    app.record_transcript("2 lakh utilities").unwrap().unwrap();
    assert_eq!(app.current_status(), Some("Added: 2.00 lakh for utilities"));
}

#[test]
fn undetected_amount_changes_nothing() {
    let mut app = setup();
    let before = saved(&app);
    assert!(app.record_transcript("bought some food").unwrap().is_none());
    assert_eq!(
        app.current_status(),
        Some("Could not detect amount. Please try again.")
    );
    assert!(app.active_expenses().is_empty());
    assert_eq!(saved(&app), before);
}

#[test]
fn added_status_clears_after_two_seconds() {
    let clock = clock();
    let mut app = App::load(store(), &clock, Config::default(), &mut AssumeYes).unwrap();
    app.record_transcript("5 food").unwrap();
    assert!(app.current_status().is_some());
    clock.advance(Duration::seconds(2));
    assert_eq!(app.current_status(), None);
}

#[test]
fn declined_confirmation_leaves_state_alone() {
    let mut app = setup();
    let e = app.record_transcript("8 food").unwrap().unwrap();

    let mut no = ScriptedPrompter::confirming(false);
    assert!(app.delete_expense(e.id, &mut no).unwrap().is_none());
    assert!(!app.clear_active_tab(&mut no).unwrap());
    assert_eq!(app.active_expenses().len(), 1);
    assert!(!app.can_undo());
    assert_eq!(
        no.asked,
        [
            "Are you sure you want to delete this expense?",
            "Are you sure you want to clear all expenses in the current tab?"
        ]
    );
}

#[test]
fn clear_sets_a_transient_status() {
    let mut app = setup();
    app.record_transcript("8 food").unwrap();
    assert!(app.clear_active_tab(&mut AssumeYes).unwrap());
    assert_eq!(app.active_total(), Decimal::ZERO);
    assert_eq!(app.current_status(), Some("All expenses cleared"));
}

#[test]
fn undo_after_switching_tabs_restores_into_the_new_tab() {
    let mut app = setup();
    let a = app.active_tab().clone();
    let e = app.record_transcript("12 food").unwrap().unwrap();
    app.delete_expense(e.id, &mut AssumeYes).unwrap().unwrap();

    let b = app.create_tab("Trip").unwrap();
    assert_eq!(app.active_tab(), &b);
    let restored = app.undo_last_delete().unwrap().unwrap();
    assert_eq!(restored, e);
    assert_eq!(app.store().total_for(&a), Decimal::ZERO);
    assert_eq!(app.store().total_for(&b), Decimal::from(12));
    assert!(app.undo_last_delete().unwrap().is_none());
}

#[test]
fn new_tab_uses_prompt_and_honours_cancel() {
    let mut app = setup();
    let mut cancel = ScriptedPrompter::answering(None);
    assert_eq!(app.new_tab(&mut cancel).unwrap(), None);
    assert_eq!(app.store().tabs().len(), 1);

    let mut named = ScriptedPrompter::answering(Some("Groceries"));
    let id = app.new_tab(&mut named).unwrap().unwrap();
    assert_eq!(id.as_str(), "tab2");
    assert_eq!(app.active_title(), "Groceries");

    let id = app.new_tab(&mut AssumeYes).unwrap().unwrap();
    assert_eq!(id.as_str(), "tab3");
    assert_eq!(app.active_title(), "New Tab 2");
}

#[test]
fn closing_active_tab_activates_first_remaining() {
    let mut app = setup();
    let b = app.create_tab("B").unwrap();
    app.close_tab(&b, &mut AssumeYes).unwrap();
    assert_eq!(app.active_tab().as_str(), "tab1");

    app.close_tab(&TabId::from("tab1"), &mut AssumeYes).unwrap();
    assert_eq!(app.store().tabs().len(), 1);
    assert_eq!(app.active_tab().as_str(), "tab3");
    assert_eq!(saved(&app).tabs.len(), 1);
}

#[test]
fn unknown_tab_operations_are_reported() {
    let mut app = setup();
    let ghost = TabId::from("tab9");
    assert!(app.switch_tab(&ghost).is_err());
    let err = app.rename_tab(&ghost, "x").unwrap_err();
    assert!(err.to_string().contains("Tab 'tab9' not found"));
    assert!(app.close_tab(&ghost, &mut AssumeYes).is_err());
}

#[test]
fn manual_add_requires_every_field() {
    let mut app = setup();
    assert!(app.add_manual(Decimal::ZERO, Category::Food, "x").is_err());
    assert!(app.add_manual(Decimal::from(3), Category::Food, "  ").is_err());
    let e = app
        .add_manual(Decimal::new(450, 2), Category::Entertainment, " cinema ")
        .unwrap();
    assert_eq!(e.description, "cinema");
    assert_eq!(app.active_total(), Decimal::new(450, 2));
}

#[test]
fn state_survives_a_reload() {
    let conn_path = tempfile::NamedTempFile::new().unwrap();
    let open = || SqliteStore::new(Connection::open(conn_path.path()).unwrap()).unwrap();

    {
        let mut app = App::load(open(), clock(), Config::default(), &mut AssumeYes).unwrap();
        app.rename_tab(&TabId::from("tab1"), "Home").unwrap();
        app.create_tab("Work").unwrap();
        app.record_transcript("20 transport").unwrap();
    }

    let mut app = App::load(open(), clock(), Config::default(), &mut AssumeYes).unwrap();
    assert_eq!(app.active_title(), "Home");
    app.switch_tab(&TabId::from("tab2")).unwrap();
    assert_eq!(app.active_title(), "Work");
    assert_eq!(app.active_total(), Decimal::from(20));
}

#[test]
fn malformed_snapshot_is_kept_aside_not_overwritten() {
    let mut kv = store();
    kv.save(TABS_KEY, "{not json").unwrap();
    kv.save(LEGACY_EXPENSES_KEY, "[]").unwrap();
    let mut prompter = ScriptedPrompter::default();
    let app = App::load(kv, clock(), Config::default(), &mut prompter).unwrap();
    assert_eq!(app.store().tabs().len(), 1);
    assert_eq!(app.active_title(), "Expenses");
    assert!(prompter.asked.is_empty());
    assert_eq!(app.storage().load(TABS_KEY).unwrap().as_deref(), Some("{not json"));
    assert_eq!(
        app.storage().load(UNREADABLE_TABS_KEY).unwrap().as_deref(),
        Some("{not json")
    );
}

#[test]
fn record_missing_a_field_does_not_wipe_other_tabs() {
    let raw = r#"[{"title":"Home","expenses":[{"id":1,"description":"rent","amount":500,"category":"utilities","date":"2025-07-01T00:00:00.000Z"}]},{"title":"Trip","expenses":[{"id":2,"description":"bus","amount":3,"date":"2025-07-02T00:00:00.000Z"}]}]"#;
    let mut kv = store();
    kv.save(TABS_KEY, raw).unwrap();
    let mut app = App::load(kv, clock(), Config::default(), &mut AssumeYes).unwrap();

    assert_eq!(app.active_title(), "Home");
    assert_eq!(app.active_total(), Decimal::from(500));
    app.switch_tab(&TabId::from("tab2")).unwrap();
    assert_eq!(app.active_expenses()[0].category, Category::Other);
    assert_eq!(app.storage().load(TABS_KEY).unwrap().as_deref(), Some(raw));
}

#[test]
fn first_tab_is_named_through_the_prompt() {
    let mut prompter = ScriptedPrompter::answering(Some("Household"));
    let app = App::load(store(), clock(), Config::default(), &mut prompter).unwrap();
    assert_eq!(prompter.asked, vec![FIRST_TAB_PROMPT.to_string()]);
    assert_eq!(app.active_title(), "Household");
    assert_eq!(saved(&app).tabs[0].title, "Household");

    let mut cancel = ScriptedPrompter::answering(None);
    let app = App::load(store(), clock(), Config::default(), &mut cancel).unwrap();
    assert_eq!(app.active_title(), "Expenses");
}

#[test]
fn closing_the_last_tab_asks_for_a_new_first_tab_name() {
    let mut app = setup();
    let mut prompter = ScriptedPrompter::answering(Some("Fresh start"));
    app.close_tab(&TabId::from("tab1"), &mut prompter).unwrap();
    assert_eq!(prompter.asked, vec![FIRST_TAB_PROMPT.to_string()]);
    assert_eq!(app.active_tab().as_str(), "tab2");
    assert_eq!(app.active_title(), "Fresh start");
    assert_eq!(saved(&app).tabs[0].title, "Fresh start");

    let mut cancel = ScriptedPrompter::answering(None);
    app.close_tab(&TabId::from("tab2"), &mut cancel).unwrap();
    assert_eq!(app.active_title(), "Expenses");

    let other = app.create_tab("Other").unwrap();
    let mut untouched = ScriptedPrompter::default();
    app.close_tab(&other, &mut untouched).unwrap();
    assert!(untouched.asked.is_empty());
}

#[test]
fn legacy_list_is_read_but_not_merged() {
    let mut kv = store();
    kv.save(
        LEGACY_EXPENSES_KEY,
        r#"[{"id":1,"description":"old","amount":4.5,"category":"food","date":"2024-01-02T03:04:05.000Z"}]"#,
    )
    .unwrap();
    let app = App::load(kv, clock(), Config::default(), &mut AssumeYes).unwrap();
    assert_eq!(app.legacy_expenses().len(), 1);
    assert_eq!(app.legacy_expenses()[0].amount, Decimal::new(45, 1));
    assert!(app.active_expenses().is_empty());
}

#[test]
fn import_replaces_everything_and_activates_first_tab() {
    let mut app = setup();
    app.create_tab("Scratch").unwrap();
    let snap = LedgerSnapshot::from_json(
        r#"[{"title":"Imported","expenses":[{"id":7,"description":"x","amount":2,"category":"other","date":"2025-01-01T00:00:00.000Z"}]}]"#,
    )
    .unwrap();
    app.import_snapshot(snap.clone()).unwrap();
    assert_eq!(app.active_title(), "Imported");
    assert_eq!(app.active_total(), Decimal::from(2));
    assert_eq!(saved(&app), snap);
}
