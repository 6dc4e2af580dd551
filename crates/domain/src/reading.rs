//! Reading sources: where simulated sensors get their values from.
//!
//! No real hardware is attached, so a sensor's value comes from an injected
//! [`ReadingSource`]. The default is a [`FixedReading`] of `0`.

use std::sync::Arc;

use crate::device::SensorType;
use crate::id::DeviceId;

/// Produces the current value of a sensor.
///
/// Sampling must be cheap and must not block: it runs while the registry
/// lock is held.
pub trait ReadingSource: Send + Sync {
    /// Current reading for sensor `id` of type `sensor_type`.
    fn sample(&self, id: DeviceId, sensor_type: SensorType) -> f64;
}

impl<T: ReadingSource + ?Sized> ReadingSource for Arc<T> {
    fn sample(&self, id: DeviceId, sensor_type: SensorType) -> f64 {
        (**self).sample(id, sensor_type)
    }
}

/// A source that always returns the same value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedReading(pub f64);

impl ReadingSource for FixedReading {
    fn sample(&self, _id: DeviceId, _sensor_type: SensorType) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_zero() {
        let id = DeviceId::new(1).unwrap();
        assert!(FixedReading::default().sample(id, SensorType::LightSensor).abs() < f64::EPSILON);
    }

    #[test]
    fn should_return_fixed_value_through_arc() {
        let source: Arc<dyn ReadingSource> = Arc::new(FixedReading(21.5));
        let id = DeviceId::new(1).unwrap();
        assert!((source.sample(id, SensorType::Co2Sensor) - 21.5).abs() < f64::EPSILON);
    }
}
