//! Device: a simulated piece of hardware: a motor, a sensor or a relay.
//!
//! The set of variants is closed. Shared behaviour (power and status) lives
//! in the [`Capability`] trait; each variant adds its own typed
//! `perform_action`. Callers that need to route an action to a specific
//! variant match on [`Device`] directly so the action/variant table is
//! checked exhaustively by the compiler.

mod kind;
mod motor;
mod relay;
mod sensor;

pub use kind::{DeviceAction, DeviceType, SensorType};
pub use motor::Motor;
pub use relay::Relay;
pub use sensor::Sensor;

use std::sync::Arc;

use crate::error::{DeviceHubError, ValidationError};
use crate::id::DeviceId;
use crate::reading::ReadingSource;
use crate::status::{DeviceStatus, PowerState};

/// Behaviour common to every device variant.
pub trait Capability {
    fn id(&self) -> DeviceId;

    fn device_type(&self) -> DeviceType;

    fn power(&self) -> PowerState;

    fn set_power(&mut self, power: PowerState);

    /// Snapshot of the current observable state.
    fn status(&self) -> DeviceStatus;

    /// Switch the device on. Always succeeds, even if it already is on.
    fn on(&mut self) -> String {
        self.set_power(PowerState::On);
        power_message(self.device_type(), self.id(), PowerState::On)
    }

    /// Switch the device off. Always succeeds, even if it already is off.
    fn off(&mut self) -> String {
        self.set_power(PowerState::Off);
        power_message(self.device_type(), self.id(), PowerState::Off)
    }
}

fn power_message(device_type: DeviceType, id: DeviceId, power: PowerState) -> String {
    format!("{} {id} is now {}.", device_type.label(), power.label())
}

/// Wrapper enum for the concrete device variants.
#[derive(Debug, Clone)]
pub enum Device {
    Motor(Motor),
    Sensor(Sensor),
    Relay(Relay),
}

impl Device {
    /// Build the variant matching `device_type`.
    ///
    /// `sensor_type` is required for sensors and ignored otherwise. Sensors
    /// start with a fixed reading of `0`; see [`with_readings`](Self::with_readings).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingSensorType`] when a sensor is
    /// requested without a sensor type.
    pub fn create(
        device_type: DeviceType,
        id: DeviceId,
        sensor_type: Option<SensorType>,
    ) -> Result<Self, DeviceHubError> {
        match device_type {
            DeviceType::Motor => Ok(Self::Motor(Motor::new(id))),
            DeviceType::Relay => Ok(Self::Relay(Relay::new(id))),
            DeviceType::Sensor => {
                let sensor_type = sensor_type.ok_or(ValidationError::MissingSensorType)?;
                Ok(Self::Sensor(Sensor::new(id, sensor_type)))
            }
        }
    }

    /// Attach a reading source. Only sensors use it; other variants are
    /// returned unchanged.
    #[must_use]
    pub fn with_readings(self, source: Arc<dyn ReadingSource>) -> Self {
        match self {
            Self::Sensor(sensor) => Self::Sensor(sensor.with_source(source)),
            other => other,
        }
    }
}

impl Capability for Device {
    fn id(&self) -> DeviceId {
        match self {
            Self::Motor(d) => d.id(),
            Self::Sensor(d) => d.id(),
            Self::Relay(d) => d.id(),
        }
    }

    fn device_type(&self) -> DeviceType {
        match self {
            Self::Motor(_) => DeviceType::Motor,
            Self::Sensor(_) => DeviceType::Sensor,
            Self::Relay(_) => DeviceType::Relay,
        }
    }

    fn power(&self) -> PowerState {
        match self {
            Self::Motor(d) => d.power(),
            Self::Sensor(d) => d.power(),
            Self::Relay(d) => d.power(),
        }
    }

    fn set_power(&mut self, power: PowerState) {
        match self {
            Self::Motor(d) => d.set_power(power),
            Self::Sensor(d) => d.set_power(power),
            Self::Relay(d) => d.set_power(power),
        }
    }

    fn status(&self) -> DeviceStatus {
        match self {
            Self::Motor(d) => d.status(),
            Self::Sensor(d) => d.status(),
            Self::Relay(d) => d.status(),
        }
    }
}
