// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DATA_DIR: &str = "VOXLEDGER_DATA_DIR";
pub const ENV_STATUS_TTL_MS: &str = "VOXLEDGER_STATUS_TTL_MS";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    // How long a status message stays visible.
    pub status_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            status_ttl: Duration::from_secs(2),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|s| !s.trim().is_empty()) {
            cfg.data_dir = Some(PathBuf::from(dir.trim()));
        }
        if let Some(ms) = lookup(ENV_STATUS_TTL_MS) {
            let ms: u64 = ms
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} '{}'", ENV_STATUS_TTL_MS, ms))?;
            cfg.status_ttl = Duration::from_millis(ms);
        }
        Ok(cfg)
    }
}
