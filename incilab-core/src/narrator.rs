//! Time-phased status narrative shown while a validation call is pending.
//!
//! The narrator is pure presentation: its phases activate on a fixed
//! schedule relative to Loading entry and say nothing about actual backend
//! progress. Each `begin` bumps a generation; a timer that fires for an
//! older generation is ignored, so phases scheduled for an abandoned
//! validation can never become visible after the session has moved on.

use std::time::Duration;

/// One narrative phase and its activation offset from Loading entry.
#[derive(Debug, Clone, Copy)]
pub struct PhaseSpec {
    pub offset: Duration,
    pub label: &'static str,
}

pub const PHASE_COUNT: usize = 4;

/// The fixed phase schedule.
pub static PHASES: [PhaseSpec; PHASE_COUNT] = [
    PhaseSpec {
        offset: Duration::from_millis(0),
        label: "Parsing formulation…",
    },
    PhaseSpec {
        offset: Duration::from_millis(1200),
        label: "Checking concentration limits…",
    },
    PhaseSpec {
        offset: Duration::from_millis(2400),
        label: "Cross-referencing regulatory annexes…",
    },
    PhaseSpec {
        offset: Duration::from_millis(3600),
        label: "Compiling compliance summary…",
    },
];

/// Ties a scheduled phase reveal to the `begin` that scheduled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarratorTicket(u64);

#[derive(Debug, Default)]
pub struct ProgressNarrator {
    generation: u64,
    active: bool,
    visible: [bool; PHASE_COUNT],
}

impl ProgressNarrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh narrative: all phases hidden, previously scheduled
    /// reveals invalidated. The caller arms one timer per entry of
    /// [`ProgressNarrator::schedule`], tagging each with the returned ticket.
    pub fn begin(&mut self) -> NarratorTicket {
        self.generation += 1;
        self.active = true;
        self.visible = [false; PHASE_COUNT];
        NarratorTicket(self.generation)
    }

    /// The (offset, phase index) pairs to arm timers for after `begin`.
    pub fn schedule() -> impl Iterator<Item = (Duration, usize)> {
        PHASES.iter().enumerate().map(|(i, p)| (p.offset, i))
    }

    /// Makes a phase visible, unless the ticket belongs to a narrative that
    /// has since been dismissed or restarted.
    pub fn reveal(&mut self, ticket: NarratorTicket, phase: usize) -> bool {
        if !self.active || ticket.0 != self.generation || phase >= PHASE_COUNT {
            return false;
        }
        self.visible[phase] = true;
        true
    }

    /// Tears the narrative down: hides every phase and invalidates pending
    /// reveals. Called on any exit from Loading.
    pub fn dismiss(&mut self) {
        self.generation += 1;
        self.active = false;
        self.visible = [false; PHASE_COUNT];
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Labels of the currently visible phases, in schedule order.
    pub fn visible_phases(&self) -> impl Iterator<Item = &'static str> + '_ {
        PHASES
            .iter()
            .zip(self.visible.iter())
            .filter(|(_, shown)| **shown)
            .map(|(p, _)| p.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_hides_all_phases() {
        let mut narrator = ProgressNarrator::new();
        let ticket = narrator.begin();
        narrator.reveal(ticket, 0);
        narrator.begin();
        assert_eq!(narrator.visible_phases().count(), 0);
    }

    #[test]
    fn test_reveal_in_schedule_order() {
        let mut narrator = ProgressNarrator::new();
        let ticket = narrator.begin();
        assert!(narrator.reveal(ticket, 0));
        assert!(narrator.reveal(ticket, 1));
        let labels: Vec<_> = narrator.visible_phases().collect();
        assert_eq!(
            labels,
            vec!["Parsing formulation…", "Checking concentration limits…"]
        );
    }

    #[test]
    fn test_stale_ticket_is_ignored_after_restart() {
        let mut narrator = ProgressNarrator::new();
        let old = narrator.begin();
        narrator.begin();
        assert!(!narrator.reveal(old, 2));
        assert_eq!(narrator.visible_phases().count(), 0);
    }

    #[test]
    fn test_dismiss_invalidates_pending_reveals() {
        let mut narrator = ProgressNarrator::new();
        let ticket = narrator.begin();
        narrator.reveal(ticket, 0);
        narrator.dismiss();
        assert!(!narrator.is_active());
        assert_eq!(narrator.visible_phases().count(), 0);
        // A timer that fires after teardown must stay invisible.
        assert!(!narrator.reveal(ticket, 1));
        assert_eq!(narrator.visible_phases().count(), 0);
    }

    #[test]
    fn test_schedule_matches_phase_table() {
        let offsets: Vec<_> = ProgressNarrator::schedule().map(|(d, _)| d).collect();
        assert_eq!(
            offsets,
            vec![
                Duration::from_millis(0),
                Duration::from_millis(1200),
                Duration::from_millis(2400),
                Duration::from_millis(3600),
            ]
        );
    }
}
