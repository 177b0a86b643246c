// Core algorithm exports
pub mod cargo;
pub mod distance;
pub mod error;
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use cargo::{CargoCategory, CargoTaxonomy};
pub use distance::{corridor_deviation, cross_track_deviation, planar_distance};
pub use error::MatchError;
pub use filters::{capacity_mask, capacity_score};
pub use matcher::{FactorTable, MatchResult, Matcher, MatchingConfig};
pub use scoring::{inverse_normalize, temporal_score};
