//! # devicehub-domain
//!
//! Pure domain model for the devicehub device simulator.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Devices** (motors, sensors, relays) as a closed set of variants
//!   sharing one capability interface
//! - Define **Device status** snapshots returned to clients
//! - Define **Reading sources** that feed simulated sensor values
//! - Define **Events** (device creation and state-change records)
//! - Contain all invariant enforcement (speed and path bounds, positive ids)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! Port traits live in the `app` crate, except [`reading::ReadingSource`],
//! which sensors hold directly and `app` re-exports.

pub mod error;
pub mod id;
pub mod time;

pub mod device;
pub mod event;
pub mod reading;
pub mod status;
