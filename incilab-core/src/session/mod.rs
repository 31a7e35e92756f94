//! Session state machines for the two async workflows (search, validate).
//!
//! A session owns its state and hands out a [`RequestTicket`] when an
//! operation begins. Whoever performs the network call passes the ticket
//! back with the completion; only the most recently issued ticket commits,
//! so a superseded response is discarded instead of clobbering newer state.

mod search;
mod validate;

pub use search::SearchSession;
pub use validate::{ValidateStart, ValidationSession};

/// Lifecycle of a session's current operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading,
    Success,
    Error,
}

/// Identifies one issued request within a session.
///
/// Tickets are per-session sequence numbers; a completion is committed only
/// when its ticket is still the latest the session issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(pub(crate) u64);
