// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use log::debug;
use rust_decimal::Decimal;

use crate::models::{Expense, LedgerSnapshot, ParsedExpense, TabId, TabSnapshot};

pub const FIRST_TAB_TITLE: &str = "Expenses";

#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
    pub id: TabId,
    pub title: String,
    pub expenses: Vec<Expense>,
}

#[derive(Debug)]
pub struct LedgerStore {
    tabs: Vec<Tab>,
    counter: u32,
    // One slot, shared by every tab.
    last_deleted: Option<Expense>,
}

impl LedgerStore {
    pub fn new() -> Self {
        let mut store = Self {
            tabs: Vec::new(),
            counter: 0,
            last_deleted: None,
        };
        store.create_tab(None);
        store
    }

    pub fn default_title(&self) -> String {
        if self.counter == 0 {
            FIRST_TAB_TITLE.to_string()
        } else {
            format!("New Tab {}", self.counter)
        }
    }

    pub fn create_tab(&mut self, title: Option<&str>) -> TabId {
        let title = title
            .map(|t| t.to_string())
            .unwrap_or_else(|| self.default_title());
        self.counter += 1;
        let id = TabId::from_counter(self.counter);
        debug!("created {} ({:?})", id, title);
        self.tabs.push(Tab {
            id: id.clone(),
            title,
            expenses: Vec::new(),
        });
        id
    }

    pub fn rename_tab(&mut self, tab_id: &TabId, title: &str) -> bool {
        match self.tab_mut(tab_id) {
            Some(tab) => {
                tab.title = title.to_string();
                true
            }
            None => false,
        }
    }

    /// Removes the tab for good. Closing the last tab leaves a fresh default one behind.
    pub fn close_tab(&mut self, tab_id: &TabId) -> Option<Tab> {
        let idx = self.tabs.iter().position(|t| &t.id == tab_id);
        let removed = match idx {
            Some(i) => Some(self.tabs.remove(i)),
            None => {
                debug!("close of unknown tab {} ignored", tab_id);
                None
            }
        };
        if self.tabs.is_empty() {
            self.create_tab(Some(FIRST_TAB_TITLE));
        }
        removed
    }

    pub fn add_expense(
        &mut self,
        tab_id: &TabId,
        parsed: &ParsedExpense,
        now: DateTime<Utc>,
    ) -> Option<Expense> {
        let expense = Expense {
            id: now.timestamp_millis(),
            description: parsed.description.clone(),
            amount: parsed.amount,
            category: parsed.category,
            date: now,
        };
        self.append(tab_id, expense)
    }

    pub fn delete_expense(&mut self, tab_id: &TabId, expense_id: i64) -> Option<Expense> {
        let tab = self.tab_mut(tab_id)?;
        let idx = tab.expenses.iter().position(|e| e.id == expense_id)?;
        let removed = tab.expenses.remove(idx);
        self.last_deleted = Some(removed.clone());
        Some(removed)
    }

    pub fn undo_last_delete(&mut self, active_tab: &TabId) -> Option<Expense> {
        if self.tab(active_tab).is_none() {
            debug!("undo into unknown tab {} ignored", active_tab);
            return None;
        }
        let expense = self.last_deleted.take()?;
        self.append(active_tab, expense)
    }

    pub fn can_undo(&self) -> bool {
        self.last_deleted.is_some()
    }

    pub fn clear_tab(&mut self, tab_id: &TabId) -> bool {
        match self.tab_mut(tab_id) {
            Some(tab) => {
                tab.expenses.clear();
                true
            }
            None => false,
        }
    }

    pub fn total_for(&self, tab_id: &TabId) -> Decimal {
        self.tab(tab_id)
            .map(|t| t.expenses.iter().map(|e| e.amount).sum())
            .unwrap_or(Decimal::ZERO)
    }

    pub fn list_sorted_by_date_desc(&self, tab_id: &TabId) -> Vec<&Expense> {
        let mut rows: Vec<&Expense> = self
            .tab(tab_id)
            .map(|t| t.expenses.iter().collect())
            .unwrap_or_default();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn tab(&self, tab_id: &TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| &t.id == tab_id)
    }

    pub fn first_tab_id(&self) -> Option<&TabId> {
        self.tabs.first().map(|t| &t.id)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            tabs: self
                .tabs
                .iter()
                .map(|t| TabSnapshot {
                    title: t.title.clone(),
                    expenses: t.expenses.clone(),
                })
                .collect(),
        }
    }

    // Tab ids are handed out again from `tab1` in snapshot order.
    pub fn restore(&mut self, snapshot: LedgerSnapshot) {
        self.tabs.clear();
        self.counter = 0;
        self.last_deleted = None;
        for saved in snapshot.tabs {
            let id = self.create_tab(Some(saved.title.as_str()));
            if let Some(tab) = self.tab_mut(&id) {
                tab.expenses = saved.expenses;
            }
        }
        if self.tabs.is_empty() {
            self.create_tab(None);
        }
    }

    fn append(&mut self, tab_id: &TabId, expense: Expense) -> Option<Expense> {
        match self.tab_mut(tab_id) {
            Some(tab) => {
                tab.expenses.push(expense.clone());
                Some(expense)
            }
            None => {
                debug!("write to unknown tab {} ignored", tab_id);
                None
            }
        }
    }

    fn tab_mut(&mut self, tab_id: &TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| &t.id == tab_id)
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}
