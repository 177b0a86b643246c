use rayon::prelude::*;

use crate::models::{ShipmentRequest, Transporter};

/// Capacity gate for one transporter
///
/// Returns exactly 1.0 when the available capacity covers the requirement and
/// 0.0 otherwise. The result multiplies the composite score, so a transporter
/// that fails here is never ranked.
#[inline]
pub fn capacity_score(available_capacity: f64, required_capacity: f64) -> f64 {
    if available_capacity >= required_capacity {
        1.0
    } else {
        0.0
    }
}

/// Capacity gate over a whole transporter table
pub fn capacity_mask(transporters: &[Transporter], request: &ShipmentRequest) -> Vec<f64> {
    transporters
        .par_iter()
        .map(|t| capacity_score(t.capacity(), request.required_capacity))
        .collect()
}
