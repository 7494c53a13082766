//! # autowater-domain
//!
//! Pure domain model for the autowater irrigation controller.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, local time
//! - Define the **reservoir** parameters and the initial sensor reading
//! - Define the **watering engine**: water-level physics, humidity
//!   hysteresis, one-shot tank alerts
//! - Define the **events** the engine emits (level reports, pump commands, alerts)
//! - Define the bus **topic** and payload contract
//! - Define the mail **notification** templates and the textual **status** line
//! - Define the daily reminder **schedule**
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod engine;
pub mod event;
pub mod notification;
pub mod reservoir;
pub mod schedule;
pub mod status;
pub mod topic;
