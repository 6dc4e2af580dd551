//! Closed vocabularies used on the wire: device types, actions, sensor types.
//!
//! Wire names are upper snake case and matched case-insensitively.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DeviceHubError, ValidationError};

macro_rules! wire_names {
    ($name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Upper snake case wire name.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }

            /// Look a variant up by wire name, ignoring ASCII case.
            #[must_use]
            pub fn from_wire_name(name: &str) -> Option<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str().eq_ignore_ascii_case(name))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// The kind of simulated hardware behind a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    Motor,
    Sensor,
    Relay,
}

wire_names!(DeviceType {
    Motor => "MOTOR",
    Sensor => "SENSOR",
    Relay => "RELAY",
});

impl DeviceType {
    /// Capitalised name used in human-readable messages (`"Motor"`).
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Motor => "Motor",
            Self::Sensor => "Sensor",
            Self::Relay => "Relay",
        }
    }
}

impl FromStr for DeviceType {
    type Err = DeviceHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire_name(s).ok_or_else(|| DeviceHubError::UnknownDeviceType(s.to_string()))
    }
}

/// A control action a client can request on a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceAction {
    On,
    Off,
    ChangeSpeed,
    ChangePath,
    GetValue,
}

wire_names!(DeviceAction {
    On => "ON",
    Off => "OFF",
    ChangeSpeed => "CHANGE_SPEED",
    ChangePath => "CHANGE_PATH",
    GetValue => "GET_VALUE",
});

impl DeviceAction {
    /// Name of the integer parameter this action consumes, if any.
    #[must_use]
    pub fn parameter_name(self) -> Option<&'static str> {
        match self {
            Self::ChangeSpeed => Some("Speed"),
            Self::ChangePath => Some("Path"),
            Self::On | Self::Off | Self::GetValue => None,
        }
    }

    /// Whether a successful call changes the device's observable state.
    ///
    /// `GET_VALUE` is a pure read.
    #[must_use]
    pub fn mutates(self) -> bool {
        !matches!(self, Self::GetValue)
    }
}

impl FromStr for DeviceAction {
    type Err = DeviceHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire_name(s).ok_or_else(|| DeviceHubError::UnknownAction(s.to_string()))
    }
}

/// What a sensor measures. Fixed when the sensor is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorType {
    LightSensor,
    Co2Sensor,
    SoilHumiditySensor,
    AirHumidityAndTemperatureSensor,
}

wire_names!(SensorType {
    LightSensor => "LIGHT_SENSOR",
    Co2Sensor => "CO2_SENSOR",
    SoilHumiditySensor => "SOIL_HUMIDITY_SENSOR",
    AirHumidityAndTemperatureSensor => "AIR_HUMIDITY_AND_TEMPERATURE_SENSOR",
});

impl SensorType {
    /// Human-readable description (`"Light Sensor"`).
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::LightSensor => "Light Sensor",
            Self::Co2Sensor => "CO2 Sensor",
            Self::SoilHumiditySensor => "Soil Humidity Sensor",
            Self::AirHumidityAndTemperatureSensor => "Air Temperature and Humidity Sensor",
        }
    }
}

impl FromStr for SensorType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire_name(s).ok_or_else(|| ValidationError::UnknownSensorType(s.to_string()))
    }
}
