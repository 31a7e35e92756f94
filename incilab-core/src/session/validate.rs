use super::{RequestTicket, Status};
use crate::model::{ValidateRequest, ValidateResponse, ValidationOutcome};
use crate::transport::TransportError;
use std::collections::BTreeMap;
use tracing::debug;

/// Owns the formulation-validation workflow: the formulation name, the raw
/// ingredient text as the user typed it, lifecycle status, the structured
/// outcome, and the last error.
pub struct ValidationSession {
    name: String,
    ingredients_raw: String,
    status: Status,
    outcome: Option<ValidationOutcome>,
    error: Option<String>,
    issued: u64,
}

/// What `begin` decided to do with the current input.
pub enum ValidateStart {
    /// Ingredient text was empty; nothing changed and nothing is sent.
    Rejected,
    /// Ingredient text failed to parse; the session moved to Error locally
    /// and nothing is sent.
    Invalid,
    /// Payload ready to send, tagged with the ticket to commit under.
    Issued {
        ticket: RequestTicket,
        request: ValidateRequest,
    },
}

impl ValidationSession {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            ingredients_raw: String::new(),
            status: Status::Idle,
            outcome: None,
            error: None,
            issued: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn ingredients_raw(&self) -> &str {
        &self.ingredients_raw
    }

    pub fn set_ingredients_raw(&mut self, raw: impl Into<String>) {
        self.ingredients_raw = raw.into();
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn outcome(&self) -> Option<&ValidationOutcome> {
        self.outcome.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Starts validation of the current formulation.
    ///
    /// The ingredient text is parsed locally before anything touches the
    /// network: empty text is silently rejected, malformed text moves the
    /// session to Error. Only a well-formed name→concentration mapping
    /// yields a ticket, and the payload carries exactly the parsed mapping.
    pub fn begin(&mut self) -> ValidateStart {
        if self.ingredients_raw.trim().is_empty() {
            return ValidateStart::Rejected;
        }

        let ingredients: BTreeMap<String, String> =
            match serde_json::from_str(&self.ingredients_raw) {
                Ok(map) => map,
                Err(err) => {
                    // The local error supersedes any in-flight request.
                    self.issued += 1;
                    self.status = Status::Error;
                    self.outcome = None;
                    self.error = Some(format!("Invalid ingredient list: {}", err));
                    return ValidateStart::Invalid;
                }
            };

        self.issued += 1;
        self.status = Status::Loading;
        self.outcome = None;
        self.error = None;
        debug!(formulation = %self.name, ticket = self.issued, "validation issued");
        ValidateStart::Issued {
            ticket: RequestTicket(self.issued),
            request: ValidateRequest {
                name: self.name.clone(),
                ingredients,
            },
        }
    }

    /// Commits a completed validation.
    ///
    /// Returns false and leaves the session untouched when the ticket has
    /// been superseded by a newer `begin`.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<ValidateResponse, TransportError>,
    ) -> bool {
        if ticket.0 != self.issued {
            debug!(ticket = ticket.0, latest = self.issued, "stale validation response discarded");
            return false;
        }
        match outcome {
            Ok(response) => {
                self.status = Status::Success;
                self.outcome = Some(ValidationOutcome::from(response));
            }
            Err(err) => {
                self.status = Status::Error;
                self.error = Some(err.to_string());
            }
        }
        true
    }
}

impl Default for ValidationSession {
    fn default() -> Self {
        Self::new()
    }
}
