//! # devicehub-adapter-tcp-json
//!
//! Driving adapter exposing the device registry over TCP.
//!
//! ## Wire format
//!
//! One JSON object per line in both directions. Requests carry a
//! `request_type` (`1` create, `2` control, `3` get state); responses are
//! always an envelope:
//!
//! ```json
//! { "result_code": 0, "error_message": "", "data": { "id": 1, "status": "on", "speed": 20 } }
//! ```
//!
//! Every failure (bad JSON, unknown request type, domain error) comes back as
//! `result_code: 1` with a human-readable `error_message`. Only socket errors
//! close a connection.
//!
//! ## Modules
//!
//! - [`protocol`]: typed requests and the response envelope
//! - [`dispatcher`]: maps requests onto [`DeviceRegistry`](devicehub_app::services::device_registry::DeviceRegistry) calls
//! - [`server`]: accept loop, one task per connection
//! - [`client`]: line-framed async client
//!
//! ## Dependency rule
//!
//! Depends on `devicehub-app` and `devicehub-domain`. Never leaks tokio
//! socket types into the application layer.

pub mod client;
pub mod dispatcher;
pub mod error;
pub mod protocol;
pub mod server;

pub use client::DeviceClient;
pub use dispatcher::Dispatcher;
pub use error::{ProtocolError, TransportError};
pub use protocol::{Request, RequestType, Response};
pub use server::{MAX_LINE_BYTES, serve, serve_with_shutdown};
