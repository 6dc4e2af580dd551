//! Event bus port: publish/subscribe for device events.

use devicehub_domain::event::Event;

/// Publishes device events to interested subscribers.
///
/// Called while the registry lock is held, so implementations must not
/// block.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event);
}

impl<T: EventPublisher + ?Sized> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) {
        (**self).publish(event);
    }
}
