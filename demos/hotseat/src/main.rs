//! Hot-seat demo: several people share one terminal and play through the
//! same command and button flow a chat bot would use.
//!
//! Each input line is `<name> <message>`:
//!
//! ```text
//! alice $c4 @bob         challenge bob to Connect4
//! bob 4                  press button 4 on the latest board
//! alice s4294967296:c3   press a button by its control id
//! alice $balance         show coins
//! quit
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` to see rejected moves.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use parlor::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Keeps coin balances in memory.
#[derive(Clone, Default)]
struct MemoryLedger {
    balances: Arc<Mutex<HashMap<ParticipantId, i64>>>,
}

impl MemoryLedger {
    fn balance(&self, participant: ParticipantId) -> i64 {
        self.balances
            .lock()
            .map(|b| b.get(&participant).copied().unwrap_or(0))
            .unwrap_or(0)
    }
}

impl Ledger for MemoryLedger {
    async fn credit(&self, participant: ParticipantId, amount: i64) {
        if let Ok(mut balances) = self.balances.lock() {
            *balances.entry(participant).or_default() += amount;
        }
    }
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

struct Roster {
    by_name: HashMap<String, ParticipantId>,
}

impl Roster {
    fn new(names: &[&str]) -> Self {
        let by_name = names
            .iter()
            .zip(1..)
            .map(|(name, id)| (name.to_string(), ParticipantId(id)))
            .collect();
        Self { by_name }
    }

    fn lookup(&self, name: &str) -> Option<ParticipantId> {
        self.by_name.get(&name.to_ascii_lowercase()).copied()
    }

    /// Display labels for the presenter.
    fn labels(&self) -> HashMap<ParticipantId, String> {
        self.by_name
            .iter()
            .map(|(name, id)| (*id, name.clone()))
            .collect()
    }

    /// Rewrites `@name` words into platform mentions (`<@id>`).
    fn expand_mentions(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|word| {
                word.strip_prefix('@')
                    .and_then(|name| self.lookup(name))
                    .map(|id| format!("<@{}>", id.0))
                    .unwrap_or_else(|| word.to_string())
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Quit,
    Say { speaker: &'a str, text: &'a str },
}

fn parse_line(line: &str) -> Option<Input<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if line.eq_ignore_ascii_case("quit") {
        return Some(Input::Quit);
    }
    let (speaker, text) = line.split_once(char::is_whitespace)?;
    Some(Input::Say {
        speaker,
        text: text.trim(),
    })
}

/// Picks the control a click refers to: a raw control id, or a 1-based
/// button number on the latest board.
fn resolve_click(text: &str, latest: Option<&RenderedView>) -> Option<String> {
    if text.contains(':') {
        return Some(text.to_string());
    }
    let n: usize = text.parse().ok()?;
    latest?
        .controls
        .get(n.checked_sub(1)?)
        .map(|c| c.id.clone())
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_view(view: &RenderedView) {
    println!("── {} ──", view.session);
    println!("{}", view.title);
    for row in &view.board {
        println!("{row}");
    }
    if let Some(footer) = &view.footer {
        println!("{footer}");
    }
    let mut current_row = 0;
    let mut line = String::new();
    for (i, control) in view.controls.iter().enumerate() {
        if control.row != current_row {
            println!("{}", line.trim_end());
            line.clear();
            current_row = control.row;
        }
        if control.disabled {
            line.push_str("[ · ] ");
        } else {
            line.push_str(&format!("[{}:{}] ", i + 1, control.label));
        }
    }
    println!("{}", line.trim_end());
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let roster = Roster::new(&["alice", "bob", "carol"]);
    let ledger = MemoryLedger::default();
    let parlor = ParlorBuilder::new().build(ledger.clone(), roster.labels());
    let mut notices = parlor.take_notices().ok_or("notice channel already taken")?;
    let parlor = Arc::new(parlor);

    // Timeouts arrive here; moves are printed by the input loop.
    let printer = {
        let parlor = Arc::clone(&parlor);
        tokio::spawn(async move {
            while let Some(notice) = notices.recv().await {
                if let SessionNotice::Abandoned { .. } = notice {
                    print_view(&parlor.render_notice(&notice));
                }
            }
        })
    };

    info!("hotseat ready: players are alice, bob, carol");
    let mut latest: Option<RenderedView> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let Some(input) = parse_line(&line) else {
            continue;
        };
        let (speaker, text) = match input {
            Input::Quit => break,
            Input::Say { speaker, text } => (speaker, text),
        };
        let Some(actor) = roster.lookup(speaker) else {
            println!("(who is {speaker}?)");
            continue;
        };

        let result = if text.starts_with(COMMAND_PREFIX) {
            if text.trim_start_matches(COMMAND_PREFIX) == "balance" {
                println!("💰 {speaker} has {} coins.", ledger.balance(actor));
                continue;
            }
            parlor.challenge(actor, &roster.expand_mentions(text)).await
        } else if let Some(control_id) = resolve_click(text, latest.as_ref()) {
            parlor.interact(actor, &control_id).await
        } else {
            println!("(say `$c4 @name`, `$ttt @name`, or a button number)");
            continue;
        };

        match result {
            Ok(view) => {
                print_view(&view);
                latest = Some(view);
            }
            Err(e) => println!("({speaker} only) {}", parlor.feedback(&e).text),
        }
    }

    parlor.shutdown().await;
    // Give the printer a moment to show boards closed by the shutdown.
    tokio::time::sleep(Duration::from_millis(50)).await;
    printer.abort();
    Ok(())
}
