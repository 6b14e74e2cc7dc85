// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::debug;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::PathBuf;

use crate::config::Config;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Voxledger", "voxledger"));

// Flat expense list written by the first release; read at startup only.
pub const LEGACY_EXPENSES_KEY: &str = "expenses";
pub const TABS_KEY: &str = "expenseTabs";
pub const UNREADABLE_TABS_KEY: &str = "expenseTabs.unreadable";

pub trait KeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

pub fn db_path(cfg: &Config) -> Result<PathBuf> {
    let data_dir = match &cfg.data_dir {
        Some(dir) => dir.clone(),
        None => {
            let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
                .context("Could not determine platform-specific data dir")?;
            proj.data_dir().to_path_buf()
        }
    };
    fs::create_dir_all(&data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("voxledger.sqlite"))
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open_or_init(cfg: &Config) -> Result<Self> {
        let path = db_path(cfg)?;
        let conn =
            Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
        Self::new(conn)
    }

    pub fn new(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let v: Option<String> = self
            .conn
            .query_row("SELECT value FROM storage WHERE key=?1", params![key], |r| {
                r.get(0)
            })
            .optional()
            .with_context(|| format!("Read key '{}'", key))?;
        Ok(v)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO storage(key, value) VALUES(?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=datetime('now')",
                params![key, value],
            )
            .with_context(|| format!("Write key '{}'", key))?;
        debug!("saved {} ({} bytes)", key, value.len());
        Ok(())
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS storage(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}
