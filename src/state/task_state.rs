//! Task state definitions for tracking crawl progress
//!
//! Every crawl task moves through these states exactly once:
//! `Pending -> Fetching -> {Expanded | Failed}`.

use std::fmt;

/// Represents the current state of a crawl task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    /// Task is queued and waiting for a worker
    Pending,

    /// A worker claimed the task and the fetch is in flight
    Fetching,

    /// Page was fetched and parsed; any child tasks were spawned at depth - 1
    Expanded,

    /// Fetch or parse failed; terminal, no retry
    Failed,
}

impl TaskState {
    /// Returns true if this is a terminal state (no further processing)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Expanded | Self::Failed)
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Expanded)
    }

    /// Returns true if the transition from `self` to `to` is legal
    pub fn can_transition_to(&self, to: TaskState) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Fetching)
                | (Self::Fetching, Self::Expanded)
                | (Self::Fetching, Self::Failed)
        )
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Expanded => "expanded",
            Self::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!TaskState::Pending.is_terminal());
        assert!(!TaskState::Fetching.is_terminal());
        assert!(TaskState::Expanded.is_terminal());
        assert!(TaskState::Failed.is_terminal());
    }

    #[test]
    fn test_success() {
        assert!(TaskState::Expanded.is_success());
        assert!(!TaskState::Failed.is_success());
        assert!(!TaskState::Pending.is_success());
    }

    #[test]
    fn test_legal_transitions() {
        assert!(TaskState::Pending.can_transition_to(TaskState::Fetching));
        assert!(TaskState::Fetching.can_transition_to(TaskState::Expanded));
        assert!(TaskState::Fetching.can_transition_to(TaskState::Failed));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!TaskState::Pending.can_transition_to(TaskState::Expanded));
        assert!(!TaskState::Expanded.can_transition_to(TaskState::Fetching));
        assert!(!TaskState::Failed.can_transition_to(TaskState::Pending));
        assert!(!TaskState::Fetching.can_transition_to(TaskState::Pending));
    }

    #[test]
    fn test_display() {
        assert_eq!(TaskState::Pending.to_string(), "pending");
        assert_eq!(TaskState::Expanded.to_string(), "expanded");
    }
}
