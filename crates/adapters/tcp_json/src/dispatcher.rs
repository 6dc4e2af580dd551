//! Request dispatcher: decodes a wire request, runs it against the
//! registry and encodes the outcome.

use std::sync::Arc;

use serde_json::{Map, Value};

use devicehub_app::ports::EventPublisher;
use devicehub_app::services::device_registry::{ControlOutcome, DeviceRegistry};
use devicehub_domain::device::DeviceAction;

use crate::error::ProtocolError;
use crate::protocol::{Request, Response};

/// Stateless front of a shared [`DeviceRegistry`]. Cheap to clone; every
/// connection holds its own copy.
pub struct Dispatcher<P> {
    registry: Arc<DeviceRegistry<P>>,
}

impl<P> Clone for Dispatcher<P> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<P: EventPublisher> Dispatcher<P> {
    #[must_use]
    pub fn new(registry: Arc<DeviceRegistry<P>>) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry<P> {
        &self.registry
    }

    /// Answer one raw request line with one response line (no trailing
    /// newline). Never fails: undecodable input yields a failure envelope.
    #[must_use]
    pub fn handle_request(&self, raw: &str) -> String {
        let response = match serde_json::from_str::<Value>(raw) {
            Ok(message) => self.handle_message(&message),
            Err(err) => {
                tracing::debug!(error = %err, "undecodable request");
                Response::error(&ProtocolError::MalformedMessage(err.to_string()))
            }
        };
        response.to_string()
    }

    /// Answer an already parsed request.
    #[must_use]
    pub fn handle_message(&self, message: &Value) -> Response {
        match Request::from_message(message).and_then(|request| self.execute(request)) {
            Ok(data) => Response::ok(data),
            Err(err) => {
                tracing::debug!(error = %err, "request rejected");
                Response::error(&err)
            }
        }
    }

    fn execute(&self, request: Request) -> Result<Value, ProtocolError> {
        match request {
            Request::Create {
                device_id,
                device_type,
                sensor_type,
            } => {
                let details = self
                    .registry
                    .create_device(device_type, device_id, sensor_type)?;
                let mut data = Map::new();
                data.insert("device_id".into(), device_id.get().into());
                data.insert("device_type".into(), device_type.as_str().into());
                data.insert("details".into(), details.into());
                Ok(Value::Object(data))
            }
            Request::Control {
                device_id,
                action,
                value,
            } => {
                let outcome = self.registry.control_device(device_id, action, value.as_deref())?;
                Ok(control_data(outcome))
            }
            Request::GetState { device_id } => {
                let status = self.registry.get_state(device_id)?;
                Ok(serde_json::to_value(status).unwrap_or_default())
            }
        }
    }
}

fn control_data(outcome: ControlOutcome) -> Value {
    let ControlOutcome {
        action,
        message,
        status,
        reading,
    } = outcome;

    let mut data = Map::new();
    data.insert("device_id".into(), status.id.get().into());
    data.insert("device_action".into(), action.as_str().into());
    data.insert("details".into(), message.into());
    match action {
        DeviceAction::On | DeviceAction::Off => {
            data.insert("device_state".into(), status.status.label().into());
        }
        DeviceAction::ChangeSpeed => {
            data.insert("speed".into(), status.speed().into());
        }
        DeviceAction::ChangePath => {
            data.insert("path".into(), status.path().into());
        }
        DeviceAction::GetValue => {
            data.insert("value".into(), reading.into());
        }
    }
    Value::Object(data)
}
