//! Event: an immutable record of something that happened to a device.
//!
//! Events are produced when a device is created and whenever a control
//! action changes its observable state. Reads never produce events.

use serde::{Deserialize, Serialize};

use crate::device::DeviceType;
use crate::id::DeviceId;
use crate::status::DeviceStatus;
use crate::time::{Timestamp, now};

/// What kind of change an [`Event`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    DeviceCreated,
    StateChanged,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeviceCreated => f.write_str("device_created"),
            Self::StateChanged => f.write_str("state_changed"),
        }
    }
}

/// A device event with its payload and the time it was recorded.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub kind: EventKind,
    pub device_id: DeviceId,
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
}

impl Event {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(kind: EventKind, device_id: DeviceId, data: serde_json::Value) -> Self {
        Self {
            kind,
            device_id,
            data,
            timestamp: now(),
        }
    }

    /// A device was registered. The payload carries its type and initial status.
    #[must_use]
    pub fn device_created(device_type: DeviceType, status: &DeviceStatus) -> Self {
        Self::new(
            EventKind::DeviceCreated,
            status.id,
            serde_json::json!({
                "device_type": device_type,
                "status": status,
            }),
        )
    }

    /// A device's observable state changed. The payload is the new status.
    #[must_use]
    pub fn state_changed(status: &DeviceStatus) -> Self {
        Self::new(
            EventKind::StateChanged,
            status.id,
            serde_json::to_value(status).unwrap_or_default(),
        )
    }
}
