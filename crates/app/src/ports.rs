//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.
//!
//! Sensor reading sources are a domain concept
//! ([`ReadingSource`](devicehub_domain::reading::ReadingSource)) and are
//! re-exported here so adapters find every seam in one place.

pub mod event_bus;

pub use devicehub_domain::reading::ReadingSource;
pub use event_bus::EventPublisher;
