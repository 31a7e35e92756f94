use super::{RequestTicket, Status};
use crate::model::SearchResultItem;
use crate::transport::TransportError;
use tracing::debug;

/// Owns the free-text query workflow: query text, lifecycle status, the
/// current result list, and the last error.
///
/// `results` and `errorMessage` are replaced wholesale on each completed
/// request, never merged.
pub struct SearchSession {
    query: String,
    status: Status,
    results: Vec<SearchResultItem>,
    error: Option<String>,
    issued: u64,
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            status: Status::Idle,
            results: Vec::new(),
            error: None,
            issued: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn results(&self) -> &[SearchResultItem] {
        &self.results
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Starts a search for the current query.
    ///
    /// A trimmed-empty query is a guard, not a failure: nothing changes and
    /// no ticket is returned. Otherwise the session enters Loading with
    /// results and error cleared, and the returned ticket must accompany the
    /// eventual completion.
    pub fn begin(&mut self) -> Option<RequestTicket> {
        if self.query.trim().is_empty() {
            return None;
        }
        self.issued += 1;
        self.status = Status::Loading;
        self.results.clear();
        self.error = None;
        debug!(query = %self.query, ticket = self.issued, "search issued");
        Some(RequestTicket(self.issued))
    }

    /// Commits a completed search.
    ///
    /// Returns false and leaves the session untouched when the ticket has
    /// been superseded by a newer `begin`.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<Vec<SearchResultItem>, TransportError>,
    ) -> bool {
        if ticket.0 != self.issued {
            debug!(ticket = ticket.0, latest = self.issued, "stale search response discarded");
            return false;
        }
        match outcome {
            Ok(results) => {
                self.status = Status::Success;
                self.results = results;
            }
            Err(err) => {
                self.status = Status::Error;
                self.error = Some(err.to_string());
            }
        }
        true
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(source_id: &str, name: &str) -> SearchResultItem {
        SearchResultItem {
            source_id: source_id.to_string(),
            inci_name: name.to_string(),
            functions: vec!["solvent".to_string()],
            text_score: 0.9,
            vector_score: 0.8,
            combined_score: 0.85,
        }
    }

    #[test]
    fn test_empty_query_is_a_noop() {
        let mut session = SearchSession::new();
        session.set_query("   ");
        assert!(session.begin().is_none());
        assert_eq!(session.status(), Status::Idle);
        assert!(session.results().is_empty());
    }

    #[test]
    fn test_begin_enters_loading_and_clears_previous_state() {
        let mut session = SearchSession::new();
        session.set_query("Aqua");
        let ticket = session.begin().unwrap();
        assert!(session.complete(ticket, Ok(vec![item("1", "Water")])));
        assert_eq!(session.results().len(), 1);

        session.set_query("Glycerin");
        session.begin().unwrap();
        assert_eq!(session.status(), Status::Loading);
        assert!(session.results().is_empty());
        assert!(session.error_message().is_none());
    }

    #[test]
    fn test_success_commits_payload() {
        let mut session = SearchSession::new();
        session.set_query("Aqua");
        let ticket = session.begin().unwrap();
        assert!(session.complete(ticket, Ok(vec![item("1", "Water")])));
        assert_eq!(session.status(), Status::Success);
        assert_eq!(session.results()[0].inci_name, "Water");
    }

    #[test]
    fn test_failure_commits_error_message() {
        let mut session = SearchSession::new();
        session.set_query("Aqua");
        let ticket = session.begin().unwrap();
        assert!(session.complete(ticket, Err(TransportError::Status(500))));
        assert_eq!(session.status(), Status::Error);
        assert_eq!(session.error_message(), Some("Backend error: 500"));
        assert!(session.results().is_empty());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut session = SearchSession::new();
        session.set_query("Aqua");
        let first = session.begin().unwrap();
        session.set_query("Glycerin");
        let second = session.begin().unwrap();

        // Second resolves before the superseded first.
        assert!(session.complete(second, Ok(vec![item("2", "Glycerin")])));
        assert!(!session.complete(first, Ok(vec![item("1", "Water")])));

        assert_eq!(session.status(), Status::Success);
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.results()[0].inci_name, "Glycerin");
    }

    #[test]
    fn test_stale_error_cannot_clobber_newer_success() {
        let mut session = SearchSession::new();
        session.set_query("Aqua");
        let first = session.begin().unwrap();
        session.set_query("Glycerin");
        let second = session.begin().unwrap();

        assert!(session.complete(second, Ok(vec![item("2", "Glycerin")])));
        assert!(!session.complete(first, Err(TransportError::Status(502))));
        assert_eq!(session.status(), Status::Success);
        assert!(session.error_message().is_none());
    }
}
