//! Typed device identifier backed by a strictly positive integer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Unique identifier for a [`Device`](crate::device::Device).
///
/// Always greater than zero. Serializes as a bare JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct DeviceId(u64);

impl DeviceId {
    /// Wrap a raw integer, rejecting zero.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveDeviceId`] when `value` is `0`.
    pub fn new(value: u64) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::NonPositiveDeviceId);
        }
        Ok(Self(value))
    }

    /// Access the inner integer.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for DeviceId {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeviceId> for u64 {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses a string made only of ASCII digits.
///
/// Signs, whitespace and empty strings are rejected, so `"+5"` and `"-1"`
/// fail the same way as `"abc"`.
impl FromStr for DeviceId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidDeviceId(s.to_string()));
        }
        let value = s
            .parse::<u64>()
            .map_err(|_| ValidationError::InvalidDeviceId(s.to_string()))?;
        Self::new(value)
    }
}
