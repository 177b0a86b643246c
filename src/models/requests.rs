use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to match a form-entered shipment (cities instead of coordinates)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomMatchRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "pickupCity")]
    pub pickup_city: String,
    #[validate(length(min = 1))]
    #[serde(alias = "dropoffCity")]
    pub dropoff_city: String,
    #[validate(length(min = 1))]
    #[serde(alias = "cropType", alias = "cargo_type")]
    pub crop_type: String,
    #[validate(range(min = 0.0))]
    #[serde(alias = "requiredCapacity")]
    pub required_capacity: f64,
    #[serde(default, alias = "requestedDate")]
    pub requested_date: Option<String>,
}
