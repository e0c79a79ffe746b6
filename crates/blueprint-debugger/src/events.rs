//! Events reported by the debug runner
//!
//! Events go from the runner to whoever drives the session (an editor, a
//! test, a log). Snapshots hold live accessors, so events are not
//! serialized directly; resolve the snapshot for a wire form.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::RuntimeError;
use crate::snapshot::PauseSnapshot;

/// Session-level state of the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnerState {
    #[default]
    Idle,
    Running,
    Paused,
}

/// Trait for receiving runner events
pub trait EventSink: Send + Sync {
    /// Returns an error if the event could not be delivered
    fn send(&self, event: RunnerEvent) -> Result<(), EventError>;
}

/// Error when sending events fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

#[derive(Debug, Clone)]
pub enum RunnerEvent {
    StateChanged(RunnerState),
    /// Execution continues from a paused or fresh state
    Resumed,
    Paused { snapshot: PauseSnapshot },
    Exception { snapshot: PauseSnapshot, error: RuntimeError },
    /// Run or step found no context to drive
    NoActiveContext,
}

impl RunnerEvent {
    pub fn snapshot(&self) -> Option<&PauseSnapshot> {
        match self {
            Self::Paused { snapshot } | Self::Exception { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }
}

/// A no-op event sink that discards all events
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: RunnerEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
#[derive(Default)]
pub struct VecEventSink {
    events: Mutex<Vec<RunnerEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<RunnerEvent> {
        self.events.lock().clone()
    }

    /// State transitions only
    pub fn states(&self) -> Vec<RunnerState> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                RunnerEvent::StateChanged(state) => Some(*state),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: RunnerEvent) -> Result<(), EventError> {
        self.events.lock().push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_event_sink() {
        let sink = VecEventSink::new();
        sink.send(RunnerEvent::StateChanged(RunnerState::Running)).unwrap();
        sink.send(RunnerEvent::Resumed).unwrap();
        sink.send(RunnerEvent::StateChanged(RunnerState::Idle)).unwrap();

        assert_eq!(sink.events().len(), 3);
        assert_eq!(sink.states(), vec![RunnerState::Running, RunnerState::Idle]);

        sink.clear();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_null_event_sink() {
        let sink = NullEventSink;
        sink.send(RunnerEvent::NoActiveContext).unwrap();
    }

    #[test]
    fn test_runner_state_serialization() {
        assert_eq!(serde_json::to_string(&RunnerState::Paused).unwrap(), "\"paused\"");
    }
}
