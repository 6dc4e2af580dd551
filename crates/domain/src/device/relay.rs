//! Relay: a device that routes to one of three paths.

use crate::error::ValidationError;
use crate::id::DeviceId;
use crate::status::{DeviceStatus, PowerState, StatusDetail};

use super::{Capability, DeviceType};

/// A simulated relay. The path is unset until first assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relay {
    id: DeviceId,
    power: PowerState,
    path: Option<u8>,
}

impl Relay {
    /// Accepted path numbers.
    pub const PATHS: std::ops::RangeInclusive<u8> = 1..=3;

    #[must_use]
    pub fn new(id: DeviceId) -> Self {
        Self {
            id,
            power: PowerState::Off,
            path: None,
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<u8> {
        self.path
    }

    /// Select a path and return a confirmation message.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::PathOutOfRange`] when `path` is not 1, 2
    /// or 3; the current path is left untouched.
    pub fn perform_action(&mut self, path: i64) -> Result<String, ValidationError> {
        let path = u8::try_from(path)
            .ok()
            .filter(|p| Self::PATHS.contains(p))
            .ok_or(ValidationError::PathOutOfRange(path))?;
        self.path = Some(path);
        Ok(format!("Path of relay {} changed to {path}.", self.id))
    }
}

impl Capability for Relay {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn device_type(&self) -> DeviceType {
        DeviceType::Relay
    }

    fn power(&self) -> PowerState {
        self.power
    }

    fn set_power(&mut self, power: PowerState) {
        self.power = power;
    }

    fn status(&self) -> DeviceStatus {
        DeviceStatus {
            id: self.id,
            status: self.power,
            detail: StatusDetail::Relay { path: self.path },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relay() -> Relay {
        Relay::new(DeviceId::new(3).unwrap())
    }

    #[test]
    fn should_start_without_path() {
        assert_eq!(relay().path(), None);
        assert_eq!(relay().status().path(), None);
    }

    #[test]
    fn should_accept_paths_one_to_three() {
        let mut relay = relay();
        for path in 1..=3 {
            relay.perform_action(path).unwrap();
            assert_eq!(relay.path(), Some(u8::try_from(path).unwrap()));
        }
    }

    #[test]
    fn should_confirm_path_change() {
        let mut relay = relay();
        assert_eq!(
            relay.perform_action(2).unwrap(),
            "Path of relay 3 changed to 2."
        );
    }

    #[test]
    fn should_reject_zero_and_four() {
        let mut relay = relay();
        relay.perform_action(1).unwrap();
        assert_eq!(
            relay.perform_action(0),
            Err(ValidationError::PathOutOfRange(0))
        );
        assert_eq!(
            relay.perform_action(4),
            Err(ValidationError::PathOutOfRange(4))
        );
        assert_eq!(relay.path(), Some(1));
    }
}
