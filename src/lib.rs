//! UzoAgro Match - spatio-temporal matching of farm shipments to transporters
//!
//! The core engine scores every transporter against a shipment request on
//! capacity, timing, cargo affinity, deadhead distance and corridor alignment,
//! then returns the best-ranked subset. The remaining modules load datasets,
//! read configuration and expose the engine over HTTP.

pub mod config;
pub mod core;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, MatchingConfig, MatchError, distance::planar_distance};
pub use models::{GeoPoint, Match, ScoringWeights, ShipmentRequest, Transporter};
