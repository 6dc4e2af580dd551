//! Motor: a device with an adjustable speed.

use crate::error::ValidationError;
use crate::id::DeviceId;
use crate::status::{DeviceStatus, PowerState, StatusDetail};

use super::{Capability, DeviceType};

/// A simulated motor. Speed starts at `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Motor {
    id: DeviceId,
    power: PowerState,
    speed: u8,
}

impl Motor {
    /// Highest accepted speed.
    pub const MAX_SPEED: u8 = 100;

    #[must_use]
    pub fn new(id: DeviceId) -> Self {
        Self {
            id,
            power: PowerState::Off,
            speed: 0,
        }
    }

    #[must_use]
    pub fn speed(&self) -> u8 {
        self.speed
    }

    /// Set the speed and return a confirmation message.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::SpeedOutOfRange`] when `speed` is outside
    /// `0..=100`; the current speed is left untouched.
    pub fn perform_action(&mut self, speed: i64) -> Result<String, ValidationError> {
        let speed = u8::try_from(speed)
            .ok()
            .filter(|s| *s <= Self::MAX_SPEED)
            .ok_or(ValidationError::SpeedOutOfRange(speed))?;
        self.speed = speed;
        Ok(format!("Speed of motor {} changed to {speed}.", self.id))
    }
}

impl Capability for Motor {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn device_type(&self) -> DeviceType {
        DeviceType::Motor
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
            detail: StatusDetail::Motor { speed: self.speed },
        }
    }
}
