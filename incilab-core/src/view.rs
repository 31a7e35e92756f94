//! Pure view composition.
//!
//! `compose` derives a renderable line list from the component states and
//! nothing else: no I/O, no mutable state, so every state transition can be
//! checked against its rendering without a terminal. Frontends map [`Tone`]
//! to whatever styling they have.

use crate::expansion::ExpansionTracker;
use crate::narrator::ProgressNarrator;
use crate::session::{SearchSession, Status, ValidationSession};
use crate::transport::resolve_report_url;

/// Semantic styling class of a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Heading,
    Normal,
    Dim,
    Info,
    Success,
    Warning,
    Error,
}

/// One renderable line.
#[derive(Debug, Clone)]
pub struct Line {
    pub tone: Tone,
    pub text: String,
}

impl Line {
    fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

/// Derives the full screen from the current component states.
pub fn compose(
    search: &SearchSession,
    expansion: &ExpansionTracker,
    validation: &ValidationSession,
    narrator: &ProgressNarrator,
    backend_up: bool,
    backend_base: &str,
) -> Vec<Line> {
    let mut lines = Vec::new();

    lines.push(Line::new(
        Tone::Heading,
        "incilab — ingredient search & formulation compliance",
    ));
    if backend_up {
        lines.push(Line::new(Tone::Dim, "backend: online"));
    } else {
        lines.push(Line::new(Tone::Warning, "backend: offline"));
    }

    compose_search(search, expansion, &mut lines);
    compose_validation(validation, narrator, backend_base, &mut lines);

    lines
}

fn compose_search(search: &SearchSession, expansion: &ExpansionTracker, lines: &mut Vec<Line>) {
    match search.status() {
        Status::Idle => {
            lines.push(Line::new(
                Tone::Dim,
                "Type a query and press enter to search the ingredient database.",
            ));
        }
        Status::Loading => {
            lines.push(Line::new(Tone::Info, "Searching…"));
        }
        Status::Error => {
            if let Some(message) = search.error_message() {
                lines.push(Line::new(Tone::Error, message));
            }
        }
        Status::Success => {
            if search.results().is_empty() {
                lines.push(Line::new(
                    Tone::Dim,
                    format!("No results for \"{}\".", search.query()),
                ));
            }
            for item in search.results() {
                let expanded = expansion.is_expanded(&item.source_id);
                let marker = if expanded { "▾" } else { "▸" };
                lines.push(Line::new(
                    Tone::Normal,
                    format!("{} {}  ({:.3})", marker, item.inci_name, item.combined_score),
                ));
                if expanded {
                    lines.push(Line::new(
                        Tone::Dim,
                        format!("    source id: {}", item.source_id),
                    ));
                    lines.push(Line::new(
                        Tone::Dim,
                        format!("    functions: {}", item.functions.join(", ")),
                    ));
                    lines.push(Line::new(
                        Tone::Dim,
                        format!(
                            "    text score: {} · vector score: {} · combined: {:.3}",
                            item.text_score, item.vector_score, item.combined_score
                        ),
                    ));
                }
            }
        }
    }
}

fn compose_validation(
    validation: &ValidationSession,
    narrator: &ProgressNarrator,
    backend_base: &str,
    lines: &mut Vec<Line>,
) {
    if validation.status() == Status::Idle {
        return;
    }

    lines.push(Line::new(Tone::Heading, "Formulation check"));

    match validation.status() {
        Status::Idle => {}
        Status::Loading => {
            for phase in narrator.visible_phases() {
                lines.push(Line::new(Tone::Info, format!("• {}", phase)));
            }
        }
        Status::Error => {
            if let Some(message) = validation.error_message() {
                lines.push(Line::new(Tone::Error, message));
            }
        }
        Status::Success => {
            let Some(outcome) = validation.outcome() else {
                return;
            };
            for verdict in &outcome.per_ingredient {
                let tone = if verdict.is_compliant() {
                    Tone::Success
                } else {
                    Tone::Warning
                };
                lines.push(Line::new(
                    tone,
                    format!(
                        "{} ({}) — {}",
                        verdict.ingredient, verdict.concentration, verdict.status
                    ),
                ));
            }
            if let Some(summary) = &outcome.narrative_summary {
                for text in summary.lines() {
                    lines.push(Line::new(Tone::Normal, text));
                }
            }
            if let Some(report_ref) = &outcome.report_ref {
                lines.push(Line::new(
                    Tone::Info,
                    format!("Report: {}", resolve_report_url(backend_base, report_ref)),
                ));
            }
        }
    }
}
