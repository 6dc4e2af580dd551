//! # devicehub-adapter-virtual
//!
//! Virtual/demo integration that feeds simulated values to sensors.
//!
//! ## Provided readings
//!
//! | Sensor type | Default baseline | Unit |
//! |-------------|------------------|------|
//! | `LIGHT_SENSOR` | 350.0 | lx |
//! | `CO2_SENSOR` | 415.0 | ppm |
//! | `SOIL_HUMIDITY_SENSOR` | 42.0 | % |
//! | `AIR_HUMIDITY_AND_TEMPERATURE_SENSOR` | 21.5 | °C |
//!
//! Every sensor of a type reads its baseline unless a per-device override
//! has been set with [`VirtualReadings::set`]. Readings are deterministic.
//!
//! ## Dependency rule
//!
//! Depends on `devicehub-app` (port traits) and `devicehub-domain` only.

mod config;

pub use config::SensorBaselines;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use devicehub_app::ports::ReadingSource;
use devicehub_domain::device::SensorType;
use devicehub_domain::id::DeviceId;

/// Simulated reading source with per-type baselines and per-device overrides.
#[derive(Debug, Default)]
pub struct VirtualReadings {
    baselines: SensorBaselines,
    overrides: Mutex<HashMap<DeviceId, f64>>,
}

impl VirtualReadings {
    /// Create a source reading `baselines` for every sensor.
    #[must_use]
    pub fn new(baselines: SensorBaselines) -> Self {
        Self {
            baselines,
            overrides: Mutex::new(HashMap::new()),
        }
    }

    /// Pin sensor `id` to `value` until [`clear`](Self::clear) is called.
    ///
    /// Nothing on the wire reaches this. It is meant for code that embeds
    /// the registry, such as simulations and end-to-end tests, and holds an
    /// `Arc<VirtualReadings>` next to the one given to the registry.
    pub fn set(&self, id: DeviceId, value: f64) {
        tracing::debug!(%id, value, "overriding virtual reading");
        self.lock_overrides().insert(id, value);
    }

    /// Return sensor `id` to its type baseline.
    pub fn clear(&self, id: DeviceId) {
        self.lock_overrides().remove(&id);
    }

    fn lock_overrides(&self) -> MutexGuard<'_, HashMap<DeviceId, f64>> {
        self.overrides
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ReadingSource for VirtualReadings {
    fn sample(&self, id: DeviceId, sensor_type: SensorType) -> f64 {
        self.lock_overrides()
            .get(&id)
            .copied()
            .unwrap_or_else(|| self.baselines.for_type(sensor_type))
    }
}
