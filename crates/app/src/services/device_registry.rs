//! Device registry: creates, controls and queries the simulated devices.
//!
//! The registry is the sole owner of every [`Device`]. All devices live in
//! one map behind one mutex; every operation takes the lock exactly once, so
//! a duplicate check and the insert that follows it can never interleave with
//! another caller.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use devicehub_domain::device::{Capability, Device, DeviceAction, DeviceType, SensorType};
use devicehub_domain::error::{DeviceHubError, NotFoundError, ValidationError};
use devicehub_domain::event::Event;
use devicehub_domain::id::DeviceId;
use devicehub_domain::reading::{FixedReading, ReadingSource};
use devicehub_domain::status::DeviceStatus;

use crate::ports::EventPublisher;

/// Result of a successful [`DeviceRegistry::control_device`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlOutcome {
    pub action: DeviceAction,
    /// Human-readable confirmation.
    pub message: String,
    /// Device status right after the action.
    pub status: DeviceStatus,
    /// The sampled value, for `GET_VALUE` only.
    pub reading: Option<f64>,
}

/// Shared registry of simulated devices.
pub struct DeviceRegistry<P> {
    devices: Mutex<HashMap<DeviceId, Device>>,
    readings: Arc<dyn ReadingSource>,
    publisher: P,
}

impl<P: EventPublisher> DeviceRegistry<P> {
    /// Create an empty registry. Sensors read a fixed `0` until
    /// [`with_readings`](Self::with_readings) installs another source.
    pub fn new(publisher: P) -> Self {
        Self {
            devices: Mutex::new(HashMap::new()),
            readings: Arc::new(FixedReading::default()),
            publisher,
        }
    }

    /// Use `readings` for every sensor created from now on.
    #[must_use]
    pub fn with_readings(mut self, readings: Arc<dyn ReadingSource>) -> Self {
        self.readings = readings;
        self
    }

    /// Register a new device.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceHubError::DuplicateId`] when `id` is taken (the
    /// registry is left untouched), or a validation error when a sensor is
    /// requested without a sensor type.
    #[tracing::instrument(skip(self))]
    pub fn create_device(
        &self,
        device_type: DeviceType,
        id: DeviceId,
        sensor_type: Option<SensorType>,
    ) -> Result<String, DeviceHubError> {
        let mut devices = self.lock();
        let Entry::Vacant(slot) = devices.entry(id) else {
            tracing::warn!(%id, "rejecting duplicate device id");
            return Err(DeviceHubError::DuplicateId(id));
        };

        let device = Device::create(device_type, id, sensor_type)?
            .with_readings(Arc::clone(&self.readings));
        let event = Event::device_created(device_type, &device.status());
        slot.insert(device);
        self.publisher.publish(event);

        tracing::info!(%id, device_type = %device_type, "device created");
        Ok(format!("A {} created with id {id}", device_type.label()))
    }

    /// Apply `action` to device `id`.
    ///
    /// `value` is the raw text of the numeric parameter. It is required by
    /// `CHANGE_SPEED` and `CHANGE_PATH` and ignored by every other action.
    /// The id and the variant are checked before the value is parsed, so an
    /// action that does not fit the device fails the same way whatever the
    /// value is.
    ///
    /// # Errors
    ///
    /// - [`DeviceHubError::NotFound`] when no device has this id
    /// - [`DeviceHubError::InvalidActionForType`] when the action does not
    ///   apply to the device's variant
    /// - [`DeviceHubError::Validation`] when the value is missing, not an
    ///   integer or out of range; the device is left untouched
    #[tracing::instrument(skip(self))]
    pub fn control_device(
        &self,
        id: DeviceId,
        action: DeviceAction,
        value: Option<&str>,
    ) -> Result<ControlOutcome, DeviceHubError> {
        let mut devices = self.lock();
        let device = devices.get_mut(&id).ok_or(NotFoundError {
            entity: "Device",
            id,
        })?;

        let (message, reading) = match (action, &mut *device) {
            (DeviceAction::On, device) => (device.on(), None),
            (DeviceAction::Off, device) => (device.off(), None),
            (DeviceAction::ChangeSpeed, Device::Motor(motor)) => {
                (motor.perform_action(require_value(action, value)?)?, None)
            }
            (DeviceAction::ChangePath, Device::Relay(relay)) => {
                (relay.perform_action(require_value(action, value)?)?, None)
            }
            (DeviceAction::GetValue, Device::Sensor(sensor)) => {
                let reading = sensor.perform_action();
                (format!("Value of sensor {id}: {reading}"), Some(reading))
            }
            (DeviceAction::ChangeSpeed, other) => {
                return Err(invalid_for_type(id, action, DeviceType::Motor, other));
            }
            (DeviceAction::ChangePath, other) => {
                return Err(invalid_for_type(id, action, DeviceType::Relay, other));
            }
            (DeviceAction::GetValue, other) => {
                return Err(invalid_for_type(id, action, DeviceType::Sensor, other));
            }
        };

        let status = device.status();
        if action.mutates() {
            self.publisher.publish(Event::state_changed(&status));
        }

        tracing::debug!(%id, %action, "device controlled");
        Ok(ControlOutcome {
            action,
            message,
            status,
            reading,
        })
    }

    /// Snapshot of device `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceHubError::NotFound`] when no device has this id.
    #[tracing::instrument(skip(self))]
    pub fn get_state(&self, id: DeviceId) -> Result<DeviceStatus, DeviceHubError> {
        self.lock()
            .get(&id)
            .map(Capability::status)
            .ok_or_else(|| NotFoundError { entity: "Device", id }.into())
    }

    /// Snapshots of every device, ordered by id.
    #[must_use]
    pub fn list_states(&self) -> Vec<DeviceStatus> {
        let mut states: Vec<DeviceStatus> = self.lock().values().map(Capability::status).collect();
        states.sort_by_key(|status| status.id);
        states
    }

    /// Number of registered devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<DeviceId, Device>> {
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn require_value(action: DeviceAction, value: Option<&str>) -> Result<i64, ValidationError> {
    let raw = value.ok_or(ValidationError::MissingValue(action))?;
    raw.trim()
        .parse()
        .map_err(|_| ValidationError::NotAnInteger {
            field: action.parameter_name().unwrap_or("Value"),
            raw: raw.to_string(),
        })
}

fn invalid_for_type(
    id: DeviceId,
    action: DeviceAction,
    expected: DeviceType,
    device: &Device,
) -> DeviceHubError {
    DeviceHubError::InvalidActionForType {
        id,
        action,
        expected,
        actual: device.device_type(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_bus::InProcessEventBus;
    use devicehub_domain::event::EventKind;
    use devicehub_domain::status::PowerState;

    fn id(value: u64) -> DeviceId {
        DeviceId::new(value).unwrap()
    }

    fn make_registry() -> DeviceRegistry<InProcessEventBus> {
        DeviceRegistry::new(InProcessEventBus::new(64))
    }

    #[test]
    fn should_create_device_and_confirm_type_and_id() {
        let registry = make_registry();
        let message = registry
            .create_device(DeviceType::Motor, id(1), None)
            .unwrap();
        assert_eq!(message, "A Motor created with id 1");
        assert!(registry.get_state(id(1)).is_ok());
    }

    #[test]
    fn should_report_only_variant_fields_after_create() {
        let registry = make_registry();
        registry.create_device(DeviceType::Motor, id(1), None).unwrap();
        registry
            .create_device(DeviceType::Sensor, id(2), Some(SensorType::LightSensor))
            .unwrap();
        registry.create_device(DeviceType::Relay, id(3), None).unwrap();

        let motor = serde_json::to_value(registry.get_state(id(1)).unwrap()).unwrap();
        let sensor = serde_json::to_value(registry.get_state(id(2)).unwrap()).unwrap();
        let relay = serde_json::to_value(registry.get_state(id(3)).unwrap()).unwrap();

        assert_eq!(motor, serde_json::json!({"id": 1, "status": "off", "speed": 0}));
        assert_eq!(
            sensor,
            serde_json::json!({"id": 2, "status": "off", "sensor_type": "LIGHT_SENSOR", "value": 0.0})
        );
        assert_eq!(relay, serde_json::json!({"id": 3, "status": "off"}));
    }

    #[test]
    fn should_reject_duplicate_id_and_keep_original() {
        let registry = make_registry();
        registry.create_device(DeviceType::Motor, id(5), None).unwrap();
        registry
            .control_device(id(5), DeviceAction::ChangeSpeed, Some("40"))
            .unwrap();

        let result = registry.create_device(DeviceType::Relay, id(5), None);
        assert!(matches!(result, Err(DeviceHubError::DuplicateId(dup)) if dup == id(5)));

        assert_eq!(registry.len(), 1);
        let status = registry.get_state(id(5)).unwrap();
        assert_eq!(status.device_type(), DeviceType::Motor);
        assert_eq!(status.speed(), Some(40));
    }

    #[test]
    fn should_not_register_sensor_without_type() {
        let registry = make_registry();
        let result = registry.create_device(DeviceType::Sensor, id(2), None);
        assert!(matches!(
            result,
            Err(DeviceHubError::Validation(ValidationError::MissingSensorType))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn should_reject_out_of_range_speed_and_keep_state() {
        let registry = make_registry();
        registry.create_device(DeviceType::Motor, id(1), None).unwrap();
        registry
            .control_device(id(1), DeviceAction::ChangeSpeed, Some("30"))
            .unwrap();

        let result = registry.control_device(id(1), DeviceAction::ChangeSpeed, Some("150"));
        assert!(matches!(
            result,
            Err(DeviceHubError::Validation(ValidationError::SpeedOutOfRange(150)))
        ));
        assert_eq!(registry.get_state(id(1)).unwrap().speed(), Some(30));
    }

    #[test]
    fn should_reject_change_speed_on_relay_whatever_the_value() {
        let registry = make_registry();
        registry.create_device(DeviceType::Relay, id(3), None).unwrap();

        for value in [Some("10"), Some("150"), Some("-4"), Some("fast"), None] {
            let result = registry.control_device(id(3), DeviceAction::ChangeSpeed, value);
            assert!(
                matches!(
                    result,
                    Err(DeviceHubError::InvalidActionForType {
                        expected: DeviceType::Motor,
                        actual: DeviceType::Relay,
                        ..
                    })
                ),
                "value {value:?} should be rejected by type"
            );
        }
    }

    #[test]
    fn should_reject_change_path_on_motor_and_get_value_on_relay() {
        let registry = make_registry();
        registry.create_device(DeviceType::Motor, id(1), None).unwrap();
        registry.create_device(DeviceType::Relay, id(3), None).unwrap();

        assert!(matches!(
            registry.control_device(id(1), DeviceAction::ChangePath, Some("2")),
            Err(DeviceHubError::InvalidActionForType { expected: DeviceType::Relay, .. })
        ));
        assert!(matches!(
            registry.control_device(id(3), DeviceAction::GetValue, None),
            Err(DeviceHubError::InvalidActionForType { expected: DeviceType::Sensor, .. })
        ));
    }

    #[test]
    fn should_require_value_for_numeric_actions() {
        let registry = make_registry();
        registry.create_device(DeviceType::Relay, id(3), None).unwrap();
        let result = registry.control_device(id(3), DeviceAction::ChangePath, None);
        assert!(matches!(
            result,
            Err(DeviceHubError::Validation(ValidationError::MissingValue(
                DeviceAction::ChangePath
            )))
        ));
    }

    #[test]
    fn should_reject_non_numeric_value_and_keep_state() {
        let registry = make_registry();
        registry.create_device(DeviceType::Motor, id(1), None).unwrap();

        let result = registry.control_device(id(1), DeviceAction::ChangeSpeed, Some("fast"));
        assert!(matches!(
            result,
            Err(DeviceHubError::Validation(ValidationError::NotAnInteger {
                field: "Speed",
                ref raw,
            })) if raw == "fast"
        ));
        assert_eq!(registry.get_state(id(1)).unwrap().speed(), Some(0));
    }

    #[test]
    fn should_look_up_id_before_parsing_value() {
        let registry = make_registry();
        assert!(matches!(
            registry.control_device(id(999), DeviceAction::ChangePath, Some("left")),
            Err(DeviceHubError::NotFound(_))
        ));
    }

    #[test]
    fn should_stay_on_when_turned_on_twice() {
        let registry = make_registry();
        registry
            .create_device(DeviceType::Sensor, id(2), Some(SensorType::Co2Sensor))
            .unwrap();
        for _ in 0..2 {
            let outcome = registry.control_device(id(2), DeviceAction::On, None).unwrap();
            assert_eq!(outcome.status.status, PowerState::On);
        }
    }

    #[test]
    fn should_run_motor_scenario_end_to_end() {
        let registry = make_registry();
        registry.create_device(DeviceType::Motor, id(1), None).unwrap();

        let on = registry.control_device(id(1), DeviceAction::On, None).unwrap();
        assert!(on.message.contains('1'));
        assert!(on.message.contains("ON"));

        let speed = registry
            .control_device(id(1), DeviceAction::ChangeSpeed, Some("20"))
            .unwrap();
        assert_eq!(speed.status.speed(), Some(20));

        let status = registry.get_state(id(1)).unwrap();
        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            serde_json::json!({"id": 1, "status": "on", "speed": 20})
        );
        assert_eq!(status.path(), None);
        assert_eq!(status.sensor_type(), None);
        assert_eq!(status.value(), None);
    }

    #[test]
    fn should_read_sensor_value_without_mutating_state() {
        let registry = make_registry();
        registry
            .create_device(DeviceType::Sensor, id(2), Some(SensorType::LightSensor))
            .unwrap();
        let before = registry.get_state(id(2)).unwrap();

        let outcome = registry
            .control_device(id(2), DeviceAction::GetValue, None)
            .unwrap();
        assert_eq!(outcome.reading, Some(0.0));
        assert_eq!(outcome.message, "Value of sensor 2: 0");
        assert_eq!(registry.get_state(id(2)).unwrap(), before);
    }

    #[test]
    fn should_sample_injected_reading_source() {
        let registry = make_registry().with_readings(Arc::new(FixedReading(412.5)));
        registry
            .create_device(DeviceType::Sensor, id(8), Some(SensorType::Co2Sensor))
            .unwrap();
        let outcome = registry
            .control_device(id(8), DeviceAction::GetValue, None)
            .unwrap();
        assert_eq!(outcome.message, "Value of sensor 8: 412.5");
    }

    #[test]
    fn should_return_not_found_for_unknown_id() {
        let registry = make_registry();
        assert!(matches!(
            registry.get_state(id(999)),
            Err(DeviceHubError::NotFound(NotFoundError { entity: "Device", .. }))
        ));
        assert!(matches!(
            registry.control_device(id(999), DeviceAction::On, None),
            Err(DeviceHubError::NotFound(_))
        ));
    }

    #[test]
    fn should_list_states_ordered_by_id() {
        let registry = make_registry();
        for raw in [9, 2, 5] {
            registry.create_device(DeviceType::Relay, id(raw), None).unwrap();
        }
        let ids: Vec<u64> = registry.list_states().iter().map(|s| s.id.get()).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[tokio::test]
    async fn should_publish_created_and_state_changed_events() {
        let bus = InProcessEventBus::new(16);
        let mut rx = bus.subscribe();
        let registry = DeviceRegistry::new(bus);

        registry.create_device(DeviceType::Motor, id(1), None).unwrap();
        registry.control_device(id(1), DeviceAction::On, None).unwrap();

        let created = rx.recv().await.unwrap();
        assert_eq!(created.kind, EventKind::DeviceCreated);
        let changed = rx.recv().await.unwrap();
        assert_eq!(changed.kind, EventKind::StateChanged);
        assert_eq!(changed.data["status"], "on");
    }

    #[tokio::test]
    async fn should_not_publish_for_reads_or_failures() {
        let bus = InProcessEventBus::new(16);
        let mut rx = bus.subscribe();
        let registry = DeviceRegistry::new(bus);

        registry
            .create_device(DeviceType::Sensor, id(2), Some(SensorType::LightSensor))
            .unwrap();
        let _ = rx.recv().await.unwrap();

        registry.control_device(id(2), DeviceAction::GetValue, None).unwrap();
        let _ = registry.control_device(id(2), DeviceAction::ChangeSpeed, Some("1"));
        let _ = registry.create_device(DeviceType::Motor, id(2), None);

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn should_admit_exactly_one_of_many_concurrent_creates() {
        let registry = make_registry();

        let successes = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| scope.spawn(|| registry.create_device(DeviceType::Motor, id(42), None)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .filter(Result::is_ok)
                .count()
        });

        assert_eq!(successes, 1);
        assert_eq!(registry.len(), 1);
    }
}
