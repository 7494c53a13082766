//! # autowater-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `BusPublisher` — publish levels and pump commands on the message bus
//!   - `Mailer` — deliver a notification mail
//! - Own the single `WateringEngine` instance behind `WateringController`
//! - Route engine events through the `NotificationGateway` after each tick
//! - Provide in-process infrastructure: tick driver, pump settling pacer,
//!   mail worker with bounded retry, daily reminders, full-state publication
//!   at the start of every bus session
//!
//! ## Dependency rule
//! Depends on `autowater-domain` only (plus `tokio` for channels and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod controller;
pub mod driver;
pub mod gateway;
pub mod mail_worker;
pub mod pacer;
pub mod ports;
pub mod reminder;
pub mod retry;
pub mod session;

#[cfg(test)]
mod test_support;
