// crates/strike-wallet-core/src/core/time.rs
// ============================================================================
// Module: Strike Wallet Time Model
// Description: Unix-second timestamps and approval timeout helpers.
// Purpose: Keep operation expiry deterministic with host-supplied clocks.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The wallet program never reads wall-clock time. Hosts pass a [`Timestamp`]
//! into every processed transaction; operation start and expiry are derived
//! from it. Durations serialize as whole seconds.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Longest approval window a policy may configure (90 days).
pub const MAX_APPROVAL_TIMEOUT: Duration = Duration::from_secs(90 * 24 * 60 * 60);

/// Shortest approval window a policy may configure.
pub const MIN_APPROVAL_TIMEOUT: Duration = Duration::from_secs(1);

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// Unix timestamp in whole seconds.
///
/// # Invariants
/// - Values are supplied by the host; the core never reads the system clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix seconds.
    #[must_use]
    pub const fn from_unix_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    /// Returns the timestamp as unix seconds.
    #[must_use]
    pub const fn as_unix_seconds(self) -> i64 {
        self.0
    }

    /// Adds a duration, returning `None` on overflow.
    #[must_use]
    pub fn checked_add(self, duration: Duration) -> Option<Self> {
        let seconds = i64::try_from(duration.as_secs()).ok()?;
        self.0.checked_add(seconds).map(Self)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Returns true when `timeout` lies within the allowed approval window.
#[must_use]
pub fn is_valid_approval_timeout(timeout: Duration) -> bool {
    timeout >= MIN_APPROVAL_TIMEOUT && timeout <= MAX_APPROVAL_TIMEOUT
}

// ============================================================================
// SECTION: Serde Helpers
// ============================================================================

/// Serializes a [`Duration`] as whole seconds.
pub mod duration_seconds {
    use std::time::Duration;

    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    /// Serializes the duration as whole seconds.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error.
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    /// Deserializes whole seconds into a duration.
    ///
    /// # Errors
    ///
    /// Returns the deserializer's error.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

/// Serializes an optional [`Duration`] as whole seconds.
pub mod duration_seconds_option {
    use std::time::Duration;

    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    /// Serializes the optional duration as whole seconds or null.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error.
    #[allow(clippy::ref_option, reason = "Signature is fixed by serde's `with` attribute.")]
    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => serializer.serialize_some(&duration.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes optional whole seconds into a duration.
    ///
    /// # Errors
    ///
    /// Returns the deserializer's error.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
