//! Identifier types.
//!
//! Ids are assigned by the server and treated as opaque strings. The only
//! local check is that an id can be spliced into a resource path.

use crate::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-assigned identifier of a remote object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Parses an id received from the server or supplied by the caller.
    ///
    /// Empty ids and ids that would change the meaning of a resource path
    /// (`/`, `?`, `#`, whitespace) are rejected as validation failures.
    pub fn parse(s: &str) -> ApiResult<Self> {
        if s.is_empty() {
            return Err(ApiError::validation("id must not be empty"));
        }
        if let Some(c) = s
            .chars()
            .find(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace())
        {
            return Err(ApiError::validation(format!(
                "malformed id {s:?}: unexpected character {c:?}"
            )));
        }
        Ok(Self(s.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityId {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
