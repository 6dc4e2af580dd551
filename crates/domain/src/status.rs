//! Device status: the read-only snapshot returned by a state query.

use serde::{Deserialize, Serialize};

use crate::device::{DeviceType, SensorType};
use crate::id::DeviceId;

/// Power state shared by every device variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    #[default]
    Off,
}

impl PowerState {
    /// Upper-case form used in confirmation messages (`"ON"`).
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
        }
    }
}

/// Snapshot of a device at the moment it was read.
///
/// Serializes flat: `{"id": 1, "status": "on", "speed": 20}`. Only the
/// fields of the originating variant are present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceStatus {
    pub id: DeviceId,
    pub status: PowerState,
    #[serde(flatten)]
    pub detail: StatusDetail,
}

/// Variant-specific part of a [`DeviceStatus`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatusDetail {
    Motor {
        speed: u8,
    },
    Sensor {
        sensor_type: SensorType,
        value: f64,
    },
    Relay {
        /// Unset until the first `CHANGE_PATH`.
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<u8>,
    },
}

impl DeviceStatus {
    /// Variant the snapshot was taken from.
    #[must_use]
    pub fn device_type(&self) -> DeviceType {
        match self.detail {
            StatusDetail::Motor { .. } => DeviceType::Motor,
            StatusDetail::Sensor { .. } => DeviceType::Sensor,
            StatusDetail::Relay { .. } => DeviceType::Relay,
        }
    }

    #[must_use]
    pub fn speed(&self) -> Option<u8> {
        match self.detail {
            StatusDetail::Motor { speed } => Some(speed),
            _ => None,
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<u8> {
        match self.detail {
            StatusDetail::Relay { path } => path,
            _ => None,
        }
    }

    #[must_use]
    pub fn sensor_type(&self) -> Option<SensorType> {
        match self.detail {
            StatusDetail::Sensor { sensor_type, .. } => Some(sensor_type),
            _ => None,
        }
    }

    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self.detail {
            StatusDetail::Sensor { value, .. } => Some(value),
            _ => None,
        }
    }
}
