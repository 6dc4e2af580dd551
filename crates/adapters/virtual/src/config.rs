//! Virtual reading configuration.

use serde::Deserialize;

use devicehub_domain::device::SensorType;

/// Baseline value reported by each sensor type.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SensorBaselines {
    /// Illuminance in lux.
    pub light: f64,
    /// CO2 concentration in ppm.
    pub co2: f64,
    /// Soil moisture in percent.
    pub soil_humidity: f64,
    /// Air temperature in degrees Celsius.
    pub air_humidity_and_temperature: f64,
}

impl SensorBaselines {
    /// Baseline for `sensor_type`.
    #[must_use]
    pub fn for_type(&self, sensor_type: SensorType) -> f64 {
        match sensor_type {
            SensorType::LightSensor => self.light,
            SensorType::Co2Sensor => self.co2,
            SensorType::SoilHumiditySensor => self.soil_humidity,
            SensorType::AirHumidityAndTemperatureSensor => self.air_humidity_and_temperature,
        }
    }
}

impl Default for SensorBaselines {
    fn default() -> Self {
        Self {
            light: 350.0,
            co2: 415.0,
            soil_humidity: 42.0,
            air_humidity_and_temperature: 21.5,
        }
    }
}
