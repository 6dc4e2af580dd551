//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`DeviceHubError`] via `#[from]`. The `Display` text of every variant is
//! the message clients receive in the `error_message` field of a failed
//! response, so it is phrased for humans.

use crate::device::{DeviceAction, DeviceType};
use crate::id::DeviceId;

/// Top-level domain error.
#[derive(Debug, thiserror::Error)]
pub enum DeviceHubError {
    /// A numeric field was malformed or out of range.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A device with this id is already registered.
    #[error("Device ID {0} already exists.")]
    DuplicateId(DeviceId),

    /// No device is registered under the requested id.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The device type name is not one of the known variants.
    #[error("Unknown device type '{0}'. Device type must be one of: MOTOR, SENSOR, RELAY.")]
    UnknownDeviceType(String),

    /// The action name is not one of the known actions.
    #[error(
        "Unknown device action '{0}'. Device action must be one of: ON, OFF, CHANGE_SPEED, CHANGE_PATH, GET_VALUE."
    )]
    UnknownAction(String),

    /// The action exists but does not apply to this device variant.
    #[error("{action} action is only valid for {expected} devices, device {id} is a {actual}.")]
    InvalidActionForType {
        id: DeviceId,
        action: DeviceAction,
        expected: DeviceType,
        actual: DeviceType,
    },
}

/// Field-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required request field is absent.
    #[error("Missing required field '{0}'.")]
    MissingField(&'static str),

    /// The device id is not a string of digits.
    #[error("Device ID must be an integer greater than zero, got '{0}'.")]
    InvalidDeviceId(String),

    /// The device id parsed to zero.
    #[error("Device ID must be greater than zero.")]
    NonPositiveDeviceId,

    /// A numeric action parameter is not an integer.
    #[error("{field} must be an integer, got '{raw}'.")]
    NotAnInteger { field: &'static str, raw: String },

    /// A numeric action was requested without its parameter.
    #[error("{0} requires a numeric value.")]
    MissingValue(DeviceAction),

    /// Motor speed outside `0..=100`.
    #[error("Speed must be between 0 and 100, got {0}.")]
    SpeedOutOfRange(i64),

    /// Relay path outside `1..=3`.
    #[error("Path must be between 1 and 3, got {0}.")]
    PathOutOfRange(i64),

    /// A sensor was created without a sensor type.
    #[error("Sensor type is required for SENSOR devices.")]
    MissingSensorType,

    /// The sensor type name is not one of the known sensor types.
    #[error(
        "Unknown sensor type '{0}'. Sensor type must be one of: LIGHT_SENSOR, CO2_SENSOR, SOIL_HUMIDITY_SENSOR, AIR_HUMIDITY_AND_TEMPERATURE_SENSOR."
    )]
    UnknownSensorType(String),
}

/// Lookup failure for an id that is not registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} with ID {id} does not exist.")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: DeviceId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: u64) -> DeviceId {
        DeviceId::new(value).unwrap()
    }

    #[test]
    fn should_display_validation_message_transparently() {
        let err: DeviceHubError = ValidationError::SpeedOutOfRange(150).into();
        assert_eq!(err.to_string(), "Speed must be between 0 and 100, got 150.");
    }

    #[test]
    fn should_display_not_found_with_id() {
        let err: DeviceHubError = NotFoundError {
            entity: "Device",
            id: id(999),
        }
        .into();
        assert_eq!(err.to_string(), "Device with ID 999 does not exist.");
    }

    #[test]
    fn should_display_duplicate_id() {
        let err = DeviceHubError::DuplicateId(id(4));
        assert_eq!(err.to_string(), "Device ID 4 already exists.");
    }

    #[test]
    fn should_name_action_and_types_when_action_is_invalid_for_type() {
        let err = DeviceHubError::InvalidActionForType {
            id: id(2),
            action: DeviceAction::ChangeSpeed,
            expected: DeviceType::Motor,
            actual: DeviceType::Relay,
        };
        assert_eq!(
            err.to_string(),
            "CHANGE_SPEED action is only valid for MOTOR devices, device 2 is a RELAY."
        );
    }

    #[test]
    fn should_echo_raw_input_for_non_integer_value() {
        let err = ValidationError::NotAnInteger {
            field: "Speed",
            raw: "fast".to_string(),
        };
        assert_eq!(err.to_string(), "Speed must be an integer, got 'fast'.");
    }
}
