// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use voxledger::app::App;
use voxledger::clock::SystemClock;
use voxledger::config::Config;
use voxledger::db::{self, SqliteStore};
use voxledger::models::TabId;
use voxledger::prompts::{AssumeYes, Prompter, TerminalPrompter};
use voxledger::{cli, commands};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let config = Config::from_env()?;
    let storage = SqliteStore::open_or_init(&config)?;
    let mut prompter: Box<dyn Prompter> = if matches.get_flag("yes") {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalPrompter)
    };
    let mut app = App::load(storage, SystemClock, config.clone(), prompter.as_mut())?;
    if let Some(tab) = matches.get_one::<String>("tab") {
        app.switch_tab(&TabId::from(tab.as_str()))?;
    }

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Data store ready at {}", db::db_path(&config)?.display());
        }
        Some((name @ ("say" | "parse" | "listen"), sub)) => {
            commands::voice::handle(&mut app, name, sub)?
        }
        Some((name @ ("add" | "list" | "total" | "rm" | "undo" | "clear"), sub)) => {
            commands::expenses::handle(&mut app, name, sub, prompter.as_mut())?
        }
        Some(("tab", sub)) => commands::tabs::handle(&mut app, sub, prompter.as_mut())?,
        Some((name @ ("export" | "import"), sub)) => {
            commands::snapshot::handle(&mut app, name, sub)?
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
