// crates/compliance-report-core/src/core/time.rs
// ============================================================================
// Module: Compliance Report Time Model
// Description: Canonical timestamps and the clock abstraction.
// Purpose: Keep report update timestamps explicit, replayable, and monotonic.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Report records and audit events carry an explicit timestamp. The engine
//! never reads wall-clock time directly; it asks a [`Clock`]. Hosts use [`SystemClock`],
//! tests use [`FixedClock`]. [`Timestamp::after`] guarantees that a freshly
//! stamped record is strictly newer than the record it replaces.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Canonical timestamp used in persisted report records.
///
/// # Invariants
/// - Values are explicitly provided by a [`Clock`]; the core never reads wall-clock time itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Timestamp {
    /// Unix epoch milliseconds.
    UnixMillis(i64),
    /// Monotonic logical time value.
    Logical(u64),
}

impl Timestamp {
    /// Returns the timestamp as unix milliseconds when available.
    #[must_use]
    pub const fn as_unix_millis(&self) -> Option<i64> {
        match self {
            Self::UnixMillis(value) => Some(*value),
            Self::Logical(_) => None,
        }
    }

    /// Returns the timestamp as logical time when available.
    #[must_use]
    pub const fn as_logical(&self) -> Option<u64> {
        match self {
            Self::UnixMillis(_) => None,
            Self::Logical(value) => Some(*value),
        }
    }

    /// Returns a timestamp strictly greater than `previous` when both share a
    /// representation, otherwise `self` unchanged.
    #[must_use]
    pub const fn after(self, previous: Option<Self>) -> Self {
        match (self, previous) {
            (Self::UnixMillis(now), Some(Self::UnixMillis(prev))) if now <= prev => {
                Self::UnixMillis(prev.saturating_add(1))
            }
            (Self::Logical(now), Some(Self::Logical(prev))) if now <= prev => {
                Self::Logical(prev.saturating_add(1))
            }
            _ => self,
        }
    }
}

// ============================================================================
// SECTION: Clocks
// ============================================================================

/// Source of the current time for report stamping.
pub trait Clock {
    /// Returns the current timestamp.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time in unix milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
        Timestamp::UnixMillis(i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
    }
}

/// Clock that always returns the same timestamp.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::Timestamp;

    #[test]
    fn after_bumps_past_equal_or_newer_previous() {
        let now = Timestamp::UnixMillis(10);
        assert_eq!(now.after(Some(Timestamp::UnixMillis(10))), Timestamp::UnixMillis(11));
        assert_eq!(now.after(Some(Timestamp::UnixMillis(42))), Timestamp::UnixMillis(43));
        assert_eq!(now.after(Some(Timestamp::UnixMillis(3))), now);
        assert_eq!(now.after(None), now);
    }

    #[test]
    fn after_keeps_mixed_representations() {
        let now = Timestamp::Logical(1);
        assert_eq!(now.after(Some(Timestamp::UnixMillis(99))), now);
        assert_eq!(now.after(Some(Timestamp::Logical(1))), Timestamp::Logical(2));
    }
}
