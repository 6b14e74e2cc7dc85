// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, command};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    ]
}

fn words(help: &'static str) -> Arg {
    Arg::new("words")
        .required(true)
        .num_args(1..)
        .trailing_var_arg(true)
        .allow_hyphen_values(true)
        .help(help)
}

pub fn build_cli() -> Command {
    command!()
        .name("voxledger")
        .about("Log expenses by voice or text into tabbed ledgers")
        .arg(
            Arg::new("tab")
                .long("tab")
                .global(true)
                .help("Tab to act on, e.g. tab2 (defaults to the first tab)"),
        )
        .arg(
            Arg::new("yes")
                .long("yes")
                .short('y')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Assume yes for confirmations and accept default names"),
        )
        .subcommand(Command::new("init").about("Create the data store"))
        .subcommand(
            Command::new("say")
                .about("Record an expense from an utterance, e.g. '30 dollars for food'")
                .arg(words("The utterance")),
        )
        .subcommand(
            Command::new("parse")
                .about("Show how an utterance would be parsed without recording it")
                .arg(words("The utterance")),
        )
        .subcommand(
            Command::new("listen")
                .about("Read one utterance per line from stdin until EOF"),
        )
        .subcommand(
            Command::new("add")
                .about("Add an expense with explicit fields")
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("description").long("description").required(true)),
        )
        .subcommand(
            Command::new("list")
                .about("List expenses of the tab, newest first")
                .args(json_args()),
        )
        .subcommand(Command::new("total").about("Show the tab total"))
        .subcommand(
            Command::new("rm")
                .about("Delete an expense (undoable once)")
                .arg(Arg::new("id").long("id").required(true)),
        )
        .subcommand(Command::new("undo").about("Restore the last deleted expense into the tab"))
        .subcommand(Command::new("clear").about("Delete every expense in the tab"))
        .subcommand(
            Command::new("tab")
                .about("Manage tabs")
                .subcommand(
                    Command::new("new")
                        .about("Create a tab")
                        .arg(Arg::new("title").long("title")),
                )
                .subcommand(Command::new("list").about("List tabs").args(json_args()))
                .subcommand(
                    Command::new("rename")
                        .about("Rename a tab")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(Arg::new("title").long("title").required(true)),
                )
                .subcommand(
                    Command::new("close")
                        .about("Close a tab and discard its expenses")
                        .arg(Arg::new("id").long("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export the ledger")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("json")
                        .help("json (full snapshot) or csv (all expenses)"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(
            Command::new("import")
                .about("Replace the ledger with a JSON snapshot")
                .arg(Arg::new("file").long("file").required(true)),
        )
}
