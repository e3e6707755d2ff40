use serde::Serialize;

use crate::session::SessionState;

/// Owned, read-only readout of a session, for collaborators that outlive
/// the borrow handed to an observer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub text: String,
    pub input: String,
    pub cursor: usize,
    pub is_complete: bool,
    pub has_errors: bool,
    pub is_at_end: bool,
    /// `None` until at least one stroke has been scored
    pub accuracy: Option<u32>,
    /// `None` until the session has completed
    pub wpm: Option<u32>,
}

impl From<&SessionState> for Snapshot {
    fn from(state: &SessionState) -> Self {
        Self {
            text: state.text().to_string(),
            input: state.input().to_string(),
            cursor: state.cursor(),
            is_complete: state.is_complete(),
            has_errors: state.has_errors(),
            is_at_end: state.is_at_end(),
            accuracy: state.accuracy(),
            wpm: state.wpm(),
        }
    }
}

impl SessionState {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(self)
    }
}
