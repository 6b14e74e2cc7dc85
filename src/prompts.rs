// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use dialoguer::{Confirm, Input};
use std::collections::VecDeque;

pub trait Prompter {
    /// `Ok(None)` means the user cancelled.
    fn prompt(&mut self, message: &str, default: &str) -> Result<Option<String>>;
    fn confirm(&mut self, message: &str) -> Result<bool>;
}

#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn prompt(&mut self, message: &str, default: &str) -> Result<Option<String>> {
        let answer = Input::<String>::new()
            .with_prompt(message)
            .default(default.to_string())
            .allow_empty(true)
            .interact_text();
        // Ctrl-C and a closed terminal both count as cancelling
        Ok(answer.ok())
    }

    fn confirm(&mut self, message: &str) -> Result<bool> {
        let answer = Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact_opt()?;
        Ok(answer.unwrap_or(false))
    }
}

/// Accepts every default without asking; backs `--yes`.
#[derive(Debug, Default)]
pub struct AssumeYes;

impl Prompter for AssumeYes {
    fn prompt(&mut self, _message: &str, default: &str) -> Result<Option<String>> {
        Ok(Some(default.to_string()))
    }

    fn confirm(&mut self, _message: &str) -> Result<bool> {
        Ok(true)
    }
}

#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    pub answers: VecDeque<Option<String>>,
    pub confirmations: VecDeque<bool>,
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn confirming(answer: bool) -> Self {
        Self {
            confirmations: VecDeque::from([answer]),
            ..Self::default()
        }
    }

    pub fn answering(answer: Option<&str>) -> Self {
        Self {
            answers: VecDeque::from([answer.map(str::to_string)]),
            ..Self::default()
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&mut self, message: &str, default: &str) -> Result<Option<String>> {
        self.asked.push(message.to_string());
        Ok(self
            .answers
            .pop_front()
            .unwrap_or_else(|| Some(default.to_string())))
    }

    fn confirm(&mut self, message: &str) -> Result<bool> {
        self.asked.push(message.to_string());
        Ok(self.confirmations.pop_front().unwrap_or(false))
    }
}
