use serde::{Deserialize, Serialize};

/// Where an entity stands relative to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// Not yet created on the server; no id.
    New,
    /// Matches the last known server state.
    Clean,
    /// At least one field changed since the last fetch or save.
    Dirty,
    /// A fetch or save is outstanding.
    InFlight,
}

impl SyncState {
    pub fn derive(has_id: bool, has_changes: bool, in_flight: bool) -> Self {
        if in_flight {
            SyncState::InFlight
        } else if !has_id {
            SyncState::New
        } else if has_changes {
            SyncState::Dirty
        } else {
            SyncState::Clean
        }
    }
}
