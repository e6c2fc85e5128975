use serde::{Deserialize, Serialize};

/// Read or write permission attached to an object when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Permissions {
    /// Whatever the server applies when nothing is specified.
    #[default]
    Default,
    /// Only the creating user.
    Owner,
    /// Any user of the same application.
    App,
    /// Anyone, including anonymous callers.
    Anyone,
}
