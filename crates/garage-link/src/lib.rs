//! Marketplace core for the Garage Link platform.
//!
//! `marketplace` carries the domain: the published plan catalog, the usage
//! policy gating vehicle and service-request creation, and the lifecycle of a
//! service request as mechanics drive it. `config`, `telemetry`, and `error`
//! hold the plumbing shared with the API binary.

pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;
