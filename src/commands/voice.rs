// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::App;
use crate::clock::Clock;
use crate::db::KeyValueStore;
use crate::parser::parse_transcript;
use crate::speech::{LineSpeech, Recorder, SpeechError, SpeechErrorKind, SpeechProvider};
use crate::utils::{fmt_money, pretty_table};
use anyhow::Result;
use log::warn;
use std::io;

pub fn handle<S: KeyValueStore, C: Clock>(
    app: &mut App<S, C>,
    name: &str,
    m: &clap::ArgMatches,
) -> Result<()> {
    match name {
        "say" => {
            let transcript = transcript_of(m);
            app.record_transcript(&transcript)?;
            print_status(app);
        }
        "parse" => {
            let transcript = transcript_of(m);
            match parse_transcript(&transcript) {
                Ok(p) => println!(
                    "{}",
                    pretty_table(
                        &["Amount", "Category", "Description"],
                        vec![vec![
                            fmt_money(&p.amount),
                            p.category.to_string(),
                            p.description_or_default().to_string(),
                        ]],
                    )
                ),
                Err(e) => println!("{}", e),
            }
        }
        "listen" => {
            let stdin = io::stdin();
            let mut recorder = Recorder::new(Some(LineSpeech::new(stdin.lock())));
            eprintln!("Speak (type) one expense per line; Ctrl-D to stop.");
            let added = listen(app, &mut recorder)?;
            println!("Recorded {} expense(s) in '{}'", added, app.active_title());
        }
        _ => {}
    }
    Ok(())
}

pub fn transcript_of(m: &clap::ArgMatches) -> String {
    m.get_many::<String>("words")
        .map(|w| w.map(String::as_str).collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

/// Runs recording sessions until the provider cancels or its input fails.
/// Returns how many expenses were added.
pub fn listen<S, C, P>(app: &mut App<S, C>, recorder: &mut Recorder<P>) -> Result<usize>
where
    S: KeyValueStore,
    C: Clock,
    P: SpeechProvider,
{
    let mut added = 0;
    loop {
        app.begin_listening();
        let outcome = recorder.capture();
        app.end_listening();
        match outcome {
            Ok(Some(transcript)) => {
                if app.record_transcript(&transcript)?.is_some() {
                    added += 1;
                }
                print_status(app);
            }
            Ok(None) => break,
            Err(SpeechError::Session(SpeechErrorKind::Io(e))) => {
                warn!("recording stopped, input failed: {}", e);
                break;
            }
            Err(SpeechError::Session(kind)) => {
                warn!("recording stopped: {:?}", kind);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(added)
}

fn print_status<S: KeyValueStore, C: Clock>(app: &App<S, C>) {
    if let Some(msg) = app.current_status() {
        println!("{}", msg);
    }
}
