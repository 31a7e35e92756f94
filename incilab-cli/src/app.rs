//! Interactive session.
//!
//! A single-threaded event loop: stdin lines, network completions, and
//! narrator timers are multiplexed with `tokio::select!`. Network calls run
//! in spawned tasks that send their completion (with the issuing ticket)
//! back over an mpsc channel; commits happen here on the loop thread, where
//! stale tickets are discarded by the owning session.

use crate::render;
use anyhow::Result;
use colored::Colorize;
use incilab_core::model::{SearchResultItem, ValidateResponse};
use incilab_core::transport::{Backend, TransportError};
use incilab_core::view;
use incilab_core::{
    ExpansionTracker, HealthMonitor, NarratorTicket, ProgressNarrator, RequestTicket,
    SearchSession, ValidateStart, ValidationSession,
};
use std::io::Write;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing::debug;

enum AppEvent {
    SearchDone {
        ticket: RequestTicket,
        outcome: Result<Vec<SearchResultItem>, TransportError>,
    },
    ValidateDone {
        ticket: RequestTicket,
        outcome: Result<ValidateResponse, TransportError>,
    },
    NarratorPhase {
        ticket: NarratorTicket,
        phase: usize,
    },
}

enum Command {
    Help,
    Quit,
    Health,
    Open(String),
    Name(String),
    Validate(Option<String>),
    Search(String),
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();

        Some(match parts.as_slice() {
            ["/help"] | ["/h"] => Command::Help,
            ["/quit"] | ["/q"] | ["quit"] | ["exit"] => Command::Quit,
            ["/health"] => Command::Health,
            ["/open", id] => Command::Open(id.trim().to_string()),
            ["/name", rest] => Command::Name(rest.trim().to_string()),
            ["/validate"] => Command::Validate(None),
            ["/validate", rest] => Command::Validate(Some(rest.trim().to_string())),
            _ if trimmed.starts_with('/') => Command::Unknown(trimmed.to_string()),
            _ => Command::Search(trimmed.to_string()),
        })
    }
}

struct App {
    backend: Arc<dyn Backend>,
    base_url: String,
    events: mpsc::Sender<AppEvent>,
    search: SearchSession,
    expansion: ExpansionTracker,
    validation: ValidationSession,
    narrator: ProgressNarrator,
    health: HealthMonitor,
}

impl App {
    fn new(backend: Arc<dyn Backend>, base_url: String, events: mpsc::Sender<AppEvent>) -> Self {
        Self {
            backend,
            base_url,
            events,
            search: SearchSession::new(),
            expansion: ExpansionTracker::new(),
            validation: ValidationSession::new(),
            narrator: ProgressNarrator::new(),
            health: HealthMonitor::new(),
        }
    }

    fn render(&self) {
        let lines = view::compose(
            &self.search,
            &self.expansion,
            &self.validation,
            &self.narrator,
            self.health.is_up(),
            &self.base_url,
        );
        render::print_document(&lines);
    }

    fn prompt(&self) {
        print!("{} ", "incilab>".bold());
        let _ = std::io::stdout().flush();
    }

    /// Returns false when the user asked to quit.
    async fn handle_line(&mut self, line: &str) -> bool {
        let Some(command) = Command::parse(line) else {
            self.prompt();
            return true;
        };

        match command {
            Command::Quit => return false,
            Command::Help => show_help(),
            Command::Health => {
                self.health.probe(self.backend.as_ref()).await;
                self.render();
            }
            Command::Open(source_id) => {
                self.expansion.toggle(&source_id);
                self.render();
            }
            Command::Name(name) => {
                self.validation.set_name(name);
                println!("Formulation name set to \"{}\".", self.validation.name());
            }
            Command::Validate(raw) => {
                if let Some(raw) = raw {
                    self.validation.set_ingredients_raw(raw);
                }
                self.start_validation();
                self.render();
            }
            Command::Search(query) => {
                self.search.set_query(query);
                self.start_search();
                self.render();
            }
            Command::Unknown(text) => {
                println!("Unknown command: {}. Try /help.", text);
            }
        }
        self.prompt();
        true
    }

    fn start_search(&mut self) {
        let Some(ticket) = self.search.begin() else {
            return;
        };
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        let query = self.search.query().to_string();
        tokio::spawn(async move {
            let outcome = backend.search(&query).await;
            let _ = events.send(AppEvent::SearchDone { ticket, outcome }).await;
        });
    }

    fn start_validation(&mut self) {
        match self.validation.begin() {
            ValidateStart::Rejected => {
                println!("Nothing to validate. Use /validate {{\"Ingredient\": \"10%\"}}.");
            }
            ValidateStart::Invalid => {
                // Leaving Loading locally; any running narrative stops now.
                self.narrator.dismiss();
            }
            ValidateStart::Issued { ticket, request } => {
                let backend = Arc::clone(&self.backend);
                let events = self.events.clone();
                tokio::spawn(async move {
                    let outcome = backend.validate(&request).await;
                    let _ = events.send(AppEvent::ValidateDone { ticket, outcome }).await;
                });

                let narrator_ticket = self.narrator.begin();
                for (offset, phase) in ProgressNarrator::schedule() {
                    let events = self.events.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(offset).await;
                        let _ = events
                            .send(AppEvent::NarratorPhase {
                                ticket: narrator_ticket,
                                phase,
                            })
                            .await;
                    });
                }
            }
        }
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SearchDone { ticket, outcome } => {
                if self.search.complete(ticket, outcome) {
                    self.render();
                    self.prompt();
                }
            }
            AppEvent::ValidateDone { ticket, outcome } => {
                if self.validation.complete(ticket, outcome) {
                    self.narrator.dismiss();
                    self.render();
                    self.prompt();
                }
            }
            AppEvent::NarratorPhase { ticket, phase } => {
                // Quietly drops reveals scheduled by a superseded validation.
                if self.narrator.reveal(ticket, phase) {
                    self.render();
                    self.prompt();
                }
            }
        }
    }
}

pub async fn run(backend: Arc<dyn Backend>, base_url: String) -> Result<()> {
    let (events, mut receiver) = mpsc::channel::<AppEvent>(32);
    let mut app = App::new(backend, base_url, events);

    // One liveness snapshot at startup; /health re-probes on demand.
    app.health.probe(app.backend.as_ref()).await;

    show_help();
    app.render();
    app.prompt();

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if !app.handle_line(&line).await {
                            break;
                        }
                    }
                    None => break,
                }
            }
            Some(event) = receiver.recv() => {
                app.handle_event(event);
            }
        }
    }

    debug!("interactive session ended");
    println!("Goodbye!");
    Ok(())
}

fn show_help() {
    println!("{}", "Commands:".bold());
    println!("  <query>            search the ingredient database");
    println!("  /open <source_id>  expand or collapse a result");
    println!("  /name <name>       set the formulation name");
    println!("  /validate <json>   check a formulation, e.g. /validate {{\"Aqua\": \"40%\"}}");
    println!("  /validate          re-check the last ingredient list");
    println!("  /health            re-probe the backend");
    println!("  /help              show this help");
    println!("  /quit              exit");
}
