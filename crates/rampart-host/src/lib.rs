//! Reference host for the Rampart siege engine.
//!
//! Provides a simulated world backend (also the integration-test harness)
//! and a fixed-cadence tick loop binary.

pub mod config;
pub mod sim;

pub use config::HostConfig;
pub use sim::{SimBotHost, SimWorld};
