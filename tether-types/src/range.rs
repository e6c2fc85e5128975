use chrono::{DateTime, SecondsFormat, Utc};

/// A half-open or closed time window used by created/modified filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    #[must_use]
    pub const fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    #[must_use]
    pub const fn since(from: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: None,
        }
    }

    #[must_use]
    pub const fn until(to: DateTime<Utc>) -> Self {
        Self {
            from: None,
            to: Some(to),
        }
    }

    /// Returns true if `at` falls inside the window (both ends inclusive).
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| at >= from) && self.to.is_none_or(|to| at <= to)
    }

    /// Encodes the range as `from,to` with RFC 3339 timestamps; an open end is empty.
    /// Sub-second precision is kept.
    pub fn to_param(&self) -> String {
        let side = |t: Option<DateTime<Utc>>| {
            t.map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
                .unwrap_or_default()
        };
        format!("{},{}", side(self.from), side(self.to))
    }

    /// Parses the `from,to` form produced by [`DateRange::to_param`].
    pub fn from_param(param: &str) -> Option<Self> {
        let (from, to) = param.split_once(',')?;
        let side = |s: &str| -> Option<Option<DateTime<Utc>>> {
            if s.is_empty() {
                Some(None)
            } else {
                DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|t| Some(t.with_timezone(&Utc)))
            }
        };
        Some(Self {
            from: side(from)?,
            to: side(to)?,
        })
    }
}
