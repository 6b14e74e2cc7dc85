// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use rust_decimal::Decimal;

use crate::clock::Clock;
use crate::config::Config;
use crate::db::{KeyValueStore, LEGACY_EXPENSES_KEY, TABS_KEY, UNREADABLE_TABS_KEY};
use crate::ledger::{FIRST_TAB_TITLE, LedgerStore};
use crate::models::{
    Category, Expense, LedgerSnapshot, ParsedExpense, TabId, expenses_from_values,
};
use crate::parser::parse_transcript;
use crate::prompts::Prompter;
use crate::utils::display_amount;

pub const LISTENING: &str = "Listening...";
pub const CLEARED: &str = "All expenses cleared";
pub const FIRST_TAB_PROMPT: &str = "Enter name for your first tab:";

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub message: String,
    /// `None` keeps the message until something replaces it.
    pub expires_at: Option<DateTime<Utc>>,
}

pub struct App<S, C> {
    storage: S,
    clock: C,
    config: Config,
    store: LedgerStore,
    active: TabId,
    status: Option<Status>,
    legacy: Vec<Expense>,
}

impl<S: KeyValueStore, C: Clock> App<S, C> {
    pub fn load(
        mut storage: S,
        clock: C,
        config: Config,
        prompter: &mut dyn Prompter,
    ) -> Result<Self> {
        let legacy = match storage.load(LEGACY_EXPENSES_KEY)? {
            Some(raw) => match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
                Ok(values) => expenses_from_values(values),
                Err(e) => {
                    warn!("ignoring unreadable legacy expenses: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        if !legacy.is_empty() {
            info!("{} legacy expenses present (not shown in tabs)", legacy.len());
        }

        let mut store = LedgerStore::new();
        let mut fresh = true;
        if let Some(raw) = storage.load(TABS_KEY)? {
            match LedgerSnapshot::from_json(&raw) {
                Ok(snap) if !snap.tabs.is_empty() => {
                    store.restore(snap);
                    fresh = false;
                }
                Ok(_) => {}
                Err(e) => {
                    // Load never writes over a stored snapshot it cannot read.
                    warn!(
                        "unreadable ledger snapshot copied to '{}': {}",
                        UNREADABLE_TABS_KEY, e
                    );
                    storage.save(UNREADABLE_TABS_KEY, &raw)?;
                    fresh = false;
                }
            }
        }
        if fresh {
            let title = first_tab_title(prompter)?;
            if let Some(first) = store.first_tab_id().cloned() {
                store.rename_tab(&first, &title);
            }
        }
        let active = store
            .first_tab_id()
            .cloned()
            .ok_or_else(|| anyhow!("Ledger has no tabs"))?;

        let mut app = Self {
            storage,
            clock,
            config,
            store,
            active,
            status: None,
            legacy,
        };
        if fresh {
            app.persist()?;
        }
        Ok(app)
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn legacy_expenses(&self) -> &[Expense] {
        &self.legacy
    }

    pub fn active_tab(&self) -> &TabId {
        &self.active
    }

    pub fn active_title(&self) -> &str {
        self.store
            .tab(&self.active)
            .map(|t| t.title.as_str())
            .unwrap_or_default()
    }

    pub fn active_expenses(&self) -> Vec<&Expense> {
        self.store.list_sorted_by_date_desc(&self.active)
    }

    pub fn active_total(&self) -> Decimal {
        self.store.total_for(&self.active)
    }

    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    pub fn switch_tab(&mut self, tab_id: &TabId) -> Result<()> {
        if self.store.tab(tab_id).is_none() {
            bail!("Tab '{}' not found", tab_id);
        }
        self.active = tab_id.clone();
        Ok(())
    }

    /// `Ok(None)` means no amount was found; the status line says so.
    pub fn record_transcript(&mut self, transcript: &str) -> Result<Option<Expense>> {
        let parsed = match parse_transcript(transcript) {
            Ok(p) => p,
            Err(e) => {
                self.set_status(e.to_string(), false);
                return Ok(None);
            }
        };
        let parsed = ParsedExpense {
            description: parsed.description_or_default().to_string(),
            ..parsed
        };
        let added = self.add_parsed(&parsed)?;
        if let Some(e) = &added {
            let msg = format!("Added: {} for {}", display_amount(&e.amount), e.category);
            self.set_status(msg, true);
        }
        Ok(added)
    }

    pub fn add_manual(
        &mut self,
        amount: Decimal,
        category: Category,
        description: &str,
    ) -> Result<Expense> {
        if amount <= Decimal::ZERO {
            bail!("Amount must be positive, got {}", amount);
        }
        let description = description.trim();
        if description.is_empty() {
            bail!("Description must not be empty");
        }
        let parsed = ParsedExpense {
            description: description.to_string(),
            amount,
            category,
        };
        self.add_parsed(&parsed)?
            .ok_or_else(|| anyhow!("Tab '{}' not found", self.active))
    }

    fn add_parsed(&mut self, parsed: &ParsedExpense) -> Result<Option<Expense>> {
        let now = self.clock.now();
        let added = self.store.add_expense(&self.active, parsed, now);
        if added.is_some() {
            self.persist()?;
        }
        Ok(added)
    }

    pub fn delete_expense(
        &mut self,
        expense_id: i64,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<Expense>> {
        if !prompter.confirm("Are you sure you want to delete this expense?")? {
            return Ok(None);
        }
        let removed = self.store.delete_expense(&self.active, expense_id);
        if removed.is_some() {
            self.persist()?;
        }
        Ok(removed)
    }

    pub fn undo_last_delete(&mut self) -> Result<Option<Expense>> {
        let restored = self.store.undo_last_delete(&self.active);
        if restored.is_some() {
            self.persist()?;
        }
        Ok(restored)
    }

    pub fn clear_active_tab(&mut self, prompter: &mut dyn Prompter) -> Result<bool> {
        if !prompter.confirm("Are you sure you want to clear all expenses in the current tab?")? {
            return Ok(false);
        }
        self.store.clear_tab(&self.active);
        self.persist()?;
        self.set_status(CLEARED.to_string(), true);
        Ok(true)
    }

    pub fn new_tab(&mut self, prompter: &mut dyn Prompter) -> Result<Option<TabId>> {
        let default = self.store.default_title();
        match prompter.prompt("Enter tab name:", &default)? {
            Some(title) => self.create_tab(&title).map(Some),
            None => Ok(None),
        }
    }

    pub fn create_tab(&mut self, title: &str) -> Result<TabId> {
        let id = self.store.create_tab(Some(title));
        self.active = id.clone();
        self.persist()?;
        Ok(id)
    }

    pub fn rename_tab(&mut self, tab_id: &TabId, title: &str) -> Result<()> {
        if !self.store.rename_tab(tab_id, title) {
            bail!("Tab '{}' not found", tab_id);
        }
        self.persist()
    }

    pub fn close_tab(&mut self, tab_id: &TabId, prompter: &mut dyn Prompter) -> Result<()> {
        let was_last = self.store.tabs().len() == 1;
        if self.store.close_tab(tab_id).is_none() {
            bail!("Tab '{}' not found", tab_id);
        }
        if was_last {
            let title = first_tab_title(prompter)?;
            if let Some(first) = self.store.first_tab_id().cloned() {
                self.store.rename_tab(&first, &title);
            }
        }
        if self.store.tab(&self.active).is_none() {
            if let Some(first) = self.store.first_tab_id() {
                self.active = first.clone();
            }
        }
        self.persist()
    }

    pub fn export_snapshot(&self) -> LedgerSnapshot {
        self.store.snapshot()
    }

    pub fn import_snapshot(&mut self, snapshot: LedgerSnapshot) -> Result<()> {
        self.store.restore(snapshot);
        if let Some(first) = self.store.first_tab_id() {
            self.active = first.clone();
        }
        self.persist()
    }

    pub fn begin_listening(&mut self) {
        self.set_status(LISTENING.to_string(), false);
    }

    pub fn end_listening(&mut self) {
        if self.status.as_ref().is_some_and(|s| s.message == LISTENING) {
            self.status = None;
        }
    }

    pub fn current_status(&self) -> Option<&str> {
        let now = self.clock.now();
        self.status
            .as_ref()
            .filter(|s| s.expires_at.is_none_or(|at| now < at))
            .map(|s| s.message.as_str())
    }

    fn set_status(&mut self, message: String, transient: bool) {
        let expires_at = if transient {
            let ttl = Duration::from_std(self.config.status_ttl).unwrap_or(Duration::seconds(2));
            Some(self.clock.now() + ttl)
        } else {
            None
        };
        info!("{}", message);
        self.status = Some(Status {
            message,
            expires_at,
        });
    }

    fn persist(&mut self) -> Result<()> {
        let json = self.store.snapshot().to_json()?;
        self.storage.save(TABS_KEY, &json)
    }
}

// Cancelling keeps the default title.
fn first_tab_title(prompter: &mut dyn Prompter) -> Result<String> {
    Ok(prompter
        .prompt(FIRST_TAB_PROMPT, FIRST_TAB_TITLE)?
        .unwrap_or_else(|| FIRST_TAB_TITLE.to_string()))
}
