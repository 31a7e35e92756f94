//! incilab-core - session state machines for the incilab compliance client
//!
//! This crate owns everything between user input and the rendered screen:
//! the HTTP transport to the ingredient backend, the search and validation
//! sessions with their stale-response handling, the expansion tracker, the
//! progress narrator shown during validation, the health monitor, and the
//! pure view composition the frontend renders from.
//!
//! The sessions are plain state machines driven through explicit operations;
//! only the transport is async. Frontends multiplex network completions and
//! timer ticks however they like (the bundled CLI uses a tokio event loop)
//! and hand each completion back to the owning session together with the
//! ticket it was issued with. A completion whose ticket has been superseded
//! is discarded, so a slow response can never overwrite a newer one.

pub mod config;
pub mod expansion;
pub mod health;
pub mod model;
pub mod narrator;
pub mod session;
pub mod transport;
pub mod view;

pub use config::Config;
pub use expansion::ExpansionTracker;
pub use health::HealthMonitor;
pub use model::{IngredientVerdict, SearchResultItem, ValidateRequest, ValidationOutcome};
pub use narrator::{NarratorTicket, ProgressNarrator};
pub use session::{RequestTicket, SearchSession, Status, ValidateStart, ValidationSession};
pub use transport::{Backend, HttpBackend, TransportError};
