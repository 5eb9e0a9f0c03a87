//! Status derivation engine.
//!
//! Pure functions of a session and an explicit `now`. Status is never
//! stored; callers recompute it on every read.

use serde::{Deserialize, Serialize};

use crate::session::Session;
use crate::Time;

const MS_PER_MINUTE: i64 = 60_000;

/// Derived display status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Within the expected duration
    Active,
    /// Elapsed time exceeds the expected duration
    Delayed,
    /// Flagged by a supervisor
    Flagged,
}

impl SessionStatus {
    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Delayed => "Delayed",
            Self::Flagged => "Flagged",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing an unknown status name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

impl std::str::FromStr for SessionStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "delayed" => Ok(Self::Delayed),
            "flagged" => Ok(Self::Flagged),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Whole minutes elapsed since the session started, floored.
///
/// Flooring (never rounding) keeps the status from flipping to delayed
/// half a minute early.
pub fn elapsed_minutes(session: &Session, now: Time) -> i64 {
    (now - session.start_time)
        .num_milliseconds()
        .div_euclid(MS_PER_MINUTE)
}

/// Derive the status of `session` at `now`.
pub fn derive_status(session: &Session, now: Time) -> SessionStatus {
    if session.flagged {
        return SessionStatus::Flagged;
    }
    if elapsed_minutes(session, now) > i64::from(session.expected_minutes) {
        SessionStatus::Delayed
    } else {
        SessionStatus::Active
    }
}

/// Human-readable duration: `45m`, `2h`, `1h 30m`.
pub fn format_duration(minutes: i64) -> String {
    if minutes < 60 {
        return format!("{}m", minutes);
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest == 0 {
        format!("{}h", hours)
    } else {
        format!("{}h {}m", hours, rest)
    }
}
