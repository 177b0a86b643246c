// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{parse_date, GeoPoint, Match, ScoringWeights, ShipmentRequest, Transporter};
pub use requests::CustomMatchRequest;
pub use responses::{ErrorResponse, HealthResponse, MatchResponse};
