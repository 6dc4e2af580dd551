//! Wire protocol: typed requests and the response envelope.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use devicehub_domain::device::{DeviceAction, DeviceType, SensorType};
use devicehub_domain::error::ValidationError;
use devicehub_domain::id::DeviceId;

use crate::error::ProtocolError;

/// `result_code` of a successful response.
pub const SUCCESS: u8 = 0;
/// `result_code` of a failed response.
pub const FAILURE: u8 = 1;

/// The numeric `request_type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    Create = 1,
    Control = 2,
    GetState = 3,
}

impl RequestType {
    /// Read `request_type` from a request object.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidRequestType`] when the field is
    /// missing, not an integer, or outside `1..=3`.
    pub fn from_message(message: &Map<String, Value>) -> Result<Self, ProtocolError> {
        match message.get("request_type").and_then(Value::as_u64) {
            Some(1) => Ok(Self::Create),
            Some(2) => Ok(Self::Control),
            Some(3) => Ok(Self::GetState),
            _ => Err(ProtocolError::InvalidRequestType),
        }
    }

    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// A decoded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Create {
        device_id: DeviceId,
        device_type: DeviceType,
        /// Only read for sensors.
        sensor_type: Option<SensorType>,
    },
    Control {
        device_id: DeviceId,
        action: DeviceAction,
        /// Raw text of `value`, only read for `CHANGE_SPEED` and
        /// `CHANGE_PATH`. The registry parses it once the device is known.
        value: Option<String>,
    },
    GetState {
        device_id: DeviceId,
    },
}

impl Request {
    /// Decode a JSON request object.
    ///
    /// Fields are checked in order: `request_type`, `device_id`, then the
    /// fields specific to the request type. Name fields are
    /// case-insensitive; `device_id` accepts a digit string or a JSON
    /// integer. `value` is kept as text.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::MalformedMessage`] when `message` is not an object
    /// - [`ProtocolError::InvalidRequestType`] for a bad `request_type`
    /// - [`ProtocolError::Domain`] for a missing or invalid field
    pub fn from_message(message: &Value) -> Result<Self, ProtocolError> {
        let message = message.as_object().ok_or_else(|| {
            ProtocolError::MalformedMessage("expected a JSON object".to_string())
        })?;

        let request_type = RequestType::from_message(message)?;
        let device_id = device_id(message)?;

        match request_type {
            RequestType::Create => {
                let device_type: DeviceType = required_text(message, "device_type")?.parse()?;
                let sensor_type = if device_type == DeviceType::Sensor {
                    text(message, "sensor_type")
                        .map(|raw| raw.parse::<SensorType>())
                        .transpose()?
                } else {
                    None
                };
                Ok(Self::Create {
                    device_id,
                    device_type,
                    sensor_type,
                })
            }
            RequestType::Control => {
                let action: DeviceAction = required_text(message, "device_action")?.parse()?;
                let value = action_value(message, action);
                Ok(Self::Control {
                    device_id,
                    action,
                    value,
                })
            }
            RequestType::GetState => Ok(Self::GetState { device_id }),
        }
    }

    #[must_use]
    pub fn request_type(&self) -> RequestType {
        match self {
            Self::Create { .. } => RequestType::Create,
            Self::Control { .. } => RequestType::Control,
            Self::GetState { .. } => RequestType::GetState,
        }
    }

    #[must_use]
    pub fn device_id(&self) -> DeviceId {
        match self {
            Self::Create { device_id, .. }
            | Self::Control { device_id, .. }
            | Self::GetState { device_id } => *device_id,
        }
    }

    /// Encode into the wire shape. Ids and values are sent as digit strings.
    #[must_use]
    pub fn to_message(&self) -> Value {
        let mut message = Map::new();
        message.insert("request_type".into(), self.request_type().code().into());
        message.insert("device_id".into(), self.device_id().to_string().into());

        match self {
            Self::Create {
                device_type,
                sensor_type,
                ..
            } => {
                message.insert("device_type".into(), device_type.as_str().into());
                if let Some(sensor_type) = sensor_type {
                    message.insert("sensor_type".into(), sensor_type.as_str().into());
                }
            }
            Self::Control { action, value, .. } => {
                message.insert("device_action".into(), action.as_str().into());
                if let Some(value) = value {
                    message.insert("value".into(), value.as_str().into());
                }
            }
            Self::GetState { .. } => {}
        }

        Value::Object(message)
    }
}

/// Response envelope sent for every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// [`SUCCESS`] or [`FAILURE`].
    pub result_code: u8,
    /// Empty on success.
    #[serde(default)]
    pub error_message: String,
    /// Request-specific payload; `{}` on failure.
    #[serde(default = "empty_object")]
    pub data: Value,
}

impl Response {
    #[must_use]
    pub fn ok(data: Value) -> Self {
        Self {
            result_code: SUCCESS,
            error_message: String::new(),
            data,
        }
    }

    #[must_use]
    pub fn error(err: &ProtocolError) -> Self {
        Self {
            result_code: FAILURE,
            error_message: err.to_string(),
            data: empty_object(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result_code == SUCCESS
    }
}

/// Compact single-line JSON, ready to be framed with a trailing newline.
impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let envelope = json!({
            "result_code": self.result_code,
            "error_message": self.error_message,
            "data": self.data,
        });
        write!(f, "{envelope}")
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Field content as text. Non-string scalars are rendered as JSON so that
/// they surface in the resulting error message.
fn text<'a>(message: &'a Map<String, Value>, field: &str) -> Option<Cow<'a, str>> {
    match message.get(field)? {
        Value::Null => None,
        Value::String(raw) => Some(Cow::Borrowed(raw.as_str())),
        other => Some(Cow::Owned(other.to_string())),
    }
}

fn required_text<'a>(
    message: &'a Map<String, Value>,
    field: &'static str,
) -> Result<Cow<'a, str>, ValidationError> {
    text(message, field).ok_or(ValidationError::MissingField(field))
}

fn device_id(message: &Map<String, Value>) -> Result<DeviceId, ValidationError> {
    match message.get("device_id") {
        None | Some(Value::Null) => Err(ValidationError::MissingField("device_id")),
        Some(Value::String(raw)) => raw.parse(),
        Some(Value::Number(number)) => match number.as_u64() {
            Some(raw) => DeviceId::new(raw),
            None => Err(ValidationError::InvalidDeviceId(number.to_string())),
        },
        Some(other) => Err(ValidationError::InvalidDeviceId(other.to_string())),
    }
}

/// Text of `value` for actions that take one. A missing or blank value is
/// `None`.
fn action_value(message: &Map<String, Value>, action: DeviceAction) -> Option<String> {
    action.parameter_name()?;
    text(message, "value")
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}
