//! Sensor: a read-only device whose value comes from a [`ReadingSource`].

use std::fmt;
use std::sync::Arc;

use crate::id::DeviceId;
use crate::reading::{FixedReading, ReadingSource};
use crate::status::{DeviceStatus, PowerState, StatusDetail};

use super::{Capability, DeviceType, SensorType};

/// A simulated sensor.
///
/// Reading the value never changes the sensor; only `on`/`off` do.
#[derive(Clone)]
pub struct Sensor {
    id: DeviceId,
    power: PowerState,
    sensor_type: SensorType,
    source: Arc<dyn ReadingSource>,
}

impl Sensor {
    /// Create a sensor reading a fixed `0`.
    #[must_use]
    pub fn new(id: DeviceId, sensor_type: SensorType) -> Self {
        Self {
            id,
            power: PowerState::Off,
            sensor_type,
            source: Arc::new(FixedReading::default()),
        }
    }

    /// Replace the reading source.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn ReadingSource>) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn sensor_type(&self) -> SensorType {
        self.sensor_type
    }

    /// Current reading from the attached source.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.source.sample(self.id, self.sensor_type)
    }

    /// Sensors take no parameter; the action is a read.
    #[must_use]
    pub fn perform_action(&self) -> f64 {
        self.value()
    }
}

impl fmt::Debug for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sensor")
            .field("id", &self.id)
            .field("power", &self.power)
            .field("sensor_type", &self.sensor_type)
            .finish_non_exhaustive()
    }
}

impl Capability for Sensor {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn device_type(&self) -> DeviceType {
        DeviceType::Sensor
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
            detail: StatusDetail::Sensor {
                sensor_type: self.sensor_type,
                value: self.value(),
            },
        }
    }
}
