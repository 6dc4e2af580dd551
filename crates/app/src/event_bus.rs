//! In-process event bus backed by a tokio broadcast channel.

use tokio::sync::broadcast;

use devicehub_domain::event::Event;

use crate::ports::EventPublisher;

/// In-process event bus using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the event is simply dropped). Clones share the same channel.
#[derive(Clone)]
pub struct InProcessEventBus {
    sender: broadcast::Sender<Event>,
}

impl InProcessEventBus {
    /// Create a new event bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events on this bus.
    ///
    /// Returns a receiver that will get all events published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, event: Event) {
        // broadcast::send fails only when there are zero receivers,
        // which is fine, so the error is ignored.
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devicehub_domain::event::EventKind;
    use devicehub_domain::id::DeviceId;

    fn event(kind: EventKind) -> Event {
        Event::new(kind, DeviceId::new(1).unwrap(), serde_json::json!({}))
    }

    #[tokio::test]
    async fn should_deliver_event_to_subscriber() {
        let bus = InProcessEventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(event(EventKind::StateChanged));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.kind, EventKind::StateChanged);
    }

    #[tokio::test]
    async fn should_deliver_event_to_multiple_subscribers() {
        let bus = InProcessEventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(event(EventKind::DeviceCreated));

        assert_eq!(rx1.recv().await.unwrap().kind, EventKind::DeviceCreated);
        assert_eq!(rx2.recv().await.unwrap().kind, EventKind::DeviceCreated);
    }

    #[tokio::test]
    async fn should_share_channel_between_clones() {
        let bus = InProcessEventBus::new(16);
        let mut rx = bus.subscribe();

        bus.clone().publish(event(EventKind::StateChanged));

        assert_eq!(rx.recv().await.unwrap().kind, EventKind::StateChanged);
    }

    #[test]
    fn should_succeed_when_no_subscribers() {
        let bus = InProcessEventBus::new(16);
        bus.publish(event(EventKind::StateChanged));
    }

    #[tokio::test]
    async fn should_not_deliver_events_published_before_subscription() {
        let bus = InProcessEventBus::new(16);
        bus.publish(event(EventKind::StateChanged));

        let mut rx = bus.subscribe();
        bus.publish(event(EventKind::DeviceCreated));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.kind, EventKind::DeviceCreated);
    }
}
