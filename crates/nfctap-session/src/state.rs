//! Tag-session state machine.
//!
//! The platform's delegate callbacks are reframed as named states and
//! validated transitions, so the whole flow is testable without any
//! platform dependency.
//!
//! # States
//!
//! - `Idle`: no session active
//! - `Polling`: radio searching for a tag
//! - `Connected`: tag detected, logical connection being established
//! - `Deciding`: capability queried, mode branch being selected
//! - `Reading` / `Writing` / `Locking`: tag operation in flight
//! - `Terminated`: session invalidated, outcome recorded
//!
//! # Valid Transitions
//!
//! - Idle → Polling → Connected → Deciding → Reading | Writing | Locking → Terminated
//! - Connected → Reading (raw identifier flow, no capability query)
//! - Connected → Polling (wrong-subtype restart)
//! - Polling | Connected | Deciding → Terminated (error exits)
//!
//! # Examples
//!
//! ```
//! use nfctap_session::{SessionState, StateMachine};
//!
//! let mut machine = StateMachine::new();
//! assert_eq!(machine.current_state(), &SessionState::Idle);
//!
//! machine.transition_to(SessionState::Polling).unwrap();
//! assert_eq!(machine.current_state(), &SessionState::Polling);
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use nfctap_core::{Error, Result};

/// Maximum number of state transitions to keep in history.
///
/// A complete session is at most six transitions plus a handful of
/// wrong-subtype restart loops, so this covers several sessions of
/// debugging context.
const MAX_HISTORY_SIZE: usize = 64;

/// States of the tag-session flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No session active.
    Idle,

    /// Radio polling for a tag.
    Polling,

    /// Tag detected, logical connection being established.
    Connected,

    /// Capability known, selecting the mode branch.
    Deciding,

    /// Read primitive in flight.
    Reading,

    /// Write primitive in flight.
    Writing,

    /// Lock flow. No tag primitive is invoked; the flow only emits a
    /// completion message.
    Locking,

    /// Session invalidated, outcome recorded.
    Terminated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            SessionState::Idle => "Idle",
            SessionState::Polling => "Polling",
            SessionState::Connected => "Connected",
            SessionState::Deciding => "Deciding",
            SessionState::Reading => "Reading",
            SessionState::Writing => "Writing",
            SessionState::Locking => "Locking",
            SessionState::Terminated => "Terminated",
        };
        write!(f, "{}", state)
    }
}

impl SessionState {
    /// Check if a transition to `target` is valid from this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use nfctap_session::SessionState;
    ///
    /// assert!(SessionState::Idle.can_transition_to(&SessionState::Polling));
    /// assert!(SessionState::Connected.can_transition_to(&SessionState::Polling));
    /// assert!(!SessionState::Idle.can_transition_to(&SessionState::Reading));
    /// ```
    pub fn can_transition_to(&self, target: &SessionState) -> bool {
        matches!(
            (self, target),
            // From Idle
            (SessionState::Idle, SessionState::Polling)
            // From Polling: detection, or a terminal error (e.g. empty detection)
            | (SessionState::Polling, SessionState::Connected | SessionState::Terminated)
            // From Connected: capability query, the raw identifier read,
            // the wrong-subtype restart, or a connect failure
            | (
                SessionState::Connected,
                SessionState::Deciding
                    | SessionState::Reading
                    | SessionState::Polling
                    | SessionState::Terminated,
            )
            // From Deciding
            | (
                SessionState::Deciding,
                SessionState::Reading
                    | SessionState::Writing
                    | SessionState::Locking
                    | SessionState::Terminated,
            )
            // Operation states only terminate
            | (
                SessionState::Reading | SessionState::Writing | SessionState::Locking,
                SessionState::Terminated,
            )
        )
    }

    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Terminated)
    }
}

/// A single state transition with timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state transitioned from.
    pub from: SessionState,

    /// The state transitioned to.
    pub to: SessionState,

    /// When the transition occurred.
    ///
    /// Not serialized; `Instant` is process-specific. Deserialization sets
    /// it to the current time.
    #[serde(skip, default = "Instant::now")]
    pub timestamp: Instant,
}

impl StateTransition {
    /// Create a new transition record with the current timestamp.
    pub fn new(from: SessionState, to: SessionState) -> Self {
        Self {
            from,
            to,
            timestamp: Instant::now(),
        }
    }
}

/// State machine driving one tag-session at a time.
///
/// Enforces valid transitions and keeps a bounded transition history.
/// Not thread-safe by design; the controller owns it exclusively.
#[derive(Debug)]
pub struct StateMachine {
    current_state: SessionState,
    history: VecDeque<StateTransition>,
}

impl StateMachine {
    /// Create a new machine in the `Idle` state.
    pub fn new() -> Self {
        Self {
            current_state: SessionState::Idle,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    /// The current state.
    pub fn current_state(&self) -> &SessionState {
        &self.current_state
    }

    /// The recorded transition history, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// Transition to `new_state`, validating the edge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStateTransition`] if the edge is not in the
    /// transition table.
    ///
    /// # Examples
    ///
    /// ```
    /// use nfctap_session::{SessionState, StateMachine};
    ///
    /// let mut machine = StateMachine::new();
    /// let transition = machine.transition_to(SessionState::Polling).unwrap();
    /// assert_eq!(transition.from, SessionState::Idle);
    ///
    /// assert!(machine.transition_to(SessionState::Reading).is_err());
    /// ```
    pub fn transition_to(&mut self, new_state: SessionState) -> Result<StateTransition> {
        if !self.current_state.can_transition_to(&new_state) {
            return Err(Error::InvalidStateTransition {
                from: self.current_state.to_string(),
                to: new_state.to_string(),
            });
        }

        let transition = StateTransition::new(self.current_state, new_state);
        self.perform_state_change(new_state, transition.clone());
        Ok(transition)
    }

    /// Force the machine into `Terminated`.
    ///
    /// Returns `None` if the machine is already terminated, making
    /// repeated invalidation a no-op.
    pub fn terminate(&mut self) -> Option<StateTransition> {
        if self.current_state.is_terminal() {
            return None;
        }
        let transition = StateTransition::new(self.current_state, SessionState::Terminated);
        self.perform_state_change(SessionState::Terminated, transition.clone());
        Some(transition)
    }

    /// Forcefully reset to `Idle`, invalidating any stale session state.
    ///
    /// Used when a new scan begins while a previous session's state is
    /// still present.
    pub fn reset(&mut self) -> StateTransition {
        let transition = StateTransition::new(self.current_state, SessionState::Idle);
        self.perform_state_change(SessionState::Idle, transition.clone());
        transition
    }

    fn perform_state_change(&mut self, new_state: SessionState, transition: StateTransition) {
        self.current_state = new_state;
        self.history.push_back(transition);
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
