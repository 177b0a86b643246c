use rayon::prelude::*;

use crate::core::{
    cargo::CargoTaxonomy,
    distance::{corridor_deviation, planar_distance},
    error::MatchError,
    filters::capacity_mask,
    scoring::{inverse_normalize, temporal_score, DEFAULT_TEMPORAL_STEPS},
};
use crate::models::{GeoPoint, Match, ScoringWeights, ShipmentRequest, Transporter};

pub const DEFAULT_TOP_K: usize = 3;

/// Everything the engine needs besides the data itself
#[derive(Debug, Clone)]
pub struct MatchingConfig {
    pub weights: ScoringWeights,
    pub top_k: usize,
    pub taxonomy: CargoTaxonomy,
    pub temporal_steps: Vec<f64>,
}

impl MatchingConfig {
    pub fn validate(&self) -> Result<(), MatchError> {
        if !self.weights.is_valid() {
            return Err(MatchError::InvalidConfig(format!(
                "weights must be non-negative and sum to 1.0, got {:?}",
                self.weights
            )));
        }
        if self.top_k == 0 {
            return Err(MatchError::InvalidConfig("top_k must be at least 1".to_string()));
        }
        if self
            .temporal_steps
            .iter()
            .any(|s| !(0.0..=1.0).contains(s))
        {
            return Err(MatchError::InvalidConfig(format!(
                "temporal steps must lie in [0, 1], got {:?}",
                self.temporal_steps
            )));
        }
        Ok(())
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            top_k: DEFAULT_TOP_K,
            taxonomy: CargoTaxonomy::default(),
            temporal_steps: DEFAULT_TEMPORAL_STEPS.to_vec(),
        }
    }
}

/// Result of matching one request
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<Match>,
    pub total_candidates: usize,
}

/// Per-request factor columns, one entry per transporter in input order
#[derive(Debug, Clone, Default)]
pub struct FactorTable {
    pub capacity: Vec<f64>,
    pub temporal: Vec<f64>,
    pub affinity: Vec<f64>,
    pub deadhead: Vec<f64>,
    pub corridor: Vec<f64>,
}

impl FactorTable {
    pub fn len(&self) -> usize {
        self.capacity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capacity.is_empty()
    }
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Input validation
/// 2. Raw factor extraction (parallel over transporters)
/// 3. Min-max normalization of the geometric factors
/// 4. Weighted, capacity-gated composite
/// 5. Stable top-K selection
///
/// Each call is independent; nothing is cached between requests.
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatchingConfig,
}

impl Matcher {
    pub fn new(config: MatchingConfig) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_default_config() -> Self {
        Self {
            config: MatchingConfig::default(),
        }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Find the best transporters for a request
    ///
    /// # Arguments
    /// * `request` - The shipment to place
    /// * `transporters` - Full candidate table, read-only for the call
    ///
    /// # Returns
    /// At most `top_k` matches with a positive composite score, best first.
    /// Equal scores keep their table order.
    pub fn find_matches(
        &self,
        request: &ShipmentRequest,
        transporters: &[Transporter],
    ) -> Result<MatchResult, MatchError> {
        validate_request(request)?;
        // Sequential so the error names the first bad row in table order
        transporters.iter().try_for_each(validate_transporter)?;

        let factors = self.score_factors(request, transporters);
        let composite = self.composite_scores(&factors);

        let matches: Vec<Match> = select_top_k(&composite, self.config.top_k)
            .into_iter()
            .map(|i| Match {
                request_id: request.request_id.clone(),
                transporter_id: transporters[i].transporter_id.clone(),
                final_score: composite[i],
                capacity_score: factors.capacity[i],
                time_score: factors.temporal[i],
                affinity_score: factors.affinity[i],
                deadhead_score: factors.deadhead[i],
                corridor_score: factors.corridor[i],
            })
            .collect();

        tracing::debug!(
            "Request {}: {} viable matches from {} transporters",
            request.request_id,
            matches.len(),
            transporters.len()
        );

        Ok(MatchResult {
            matches,
            total_candidates: transporters.len(),
        })
    }

    /// Match every request independently and concatenate the results
    pub fn match_all(
        &self,
        requests: &[ShipmentRequest],
        transporters: &[Transporter],
    ) -> Result<Vec<Match>, MatchError> {
        let mut all = Vec::new();
        for request in requests {
            all.extend(self.find_matches(request, transporters)?.matches);
        }
        Ok(all)
    }

    /// Compute every factor column for one request
    ///
    /// Deadhead and corridor are returned already normalized to [0, 1].
    pub fn score_factors(&self, request: &ShipmentRequest, transporters: &[Transporter]) -> FactorTable {
        let steps = &self.config.temporal_steps;
        let taxonomy = &self.config.taxonomy;

        let capacity = capacity_mask(transporters, request);
        let temporal = transporters
            .par_iter()
            .map(|t| temporal_score(t.available_date, request.requested_date, steps))
            .collect();
        let affinity = transporters
            .par_iter()
            .map(|t| taxonomy.affinity_score(&request.cargo_type, t.allowed_labels()))
            .collect();
        let deadhead_raw: Vec<f64> = transporters
            .par_iter()
            .map(|t| planar_distance(t.current, request.pickup))
            .collect();
        let corridor_raw: Vec<f64> = transporters
            .par_iter()
            .map(|t| {
                corridor_deviation(
                    t.current,
                    t.home_base_or_current(),
                    request.pickup,
                    request.dropoff,
                )
            })
            .collect();

        FactorTable {
            capacity,
            temporal,
            affinity,
            deadhead: inverse_normalize(&deadhead_raw),
            corridor: inverse_normalize(&corridor_raw),
        }
    }

    /// Weighted sum of the scored factors, gated by capacity
    pub fn composite_scores(&self, factors: &FactorTable) -> Vec<f64> {
        let w = &self.config.weights;
        (0..factors.len())
            .into_par_iter()
            .map(|i| {
                let weighted = w.deadhead * factors.deadhead[i]
                    + w.corridor * factors.corridor[i]
                    + w.affinity * factors.affinity[i]
                    + w.temporal * factors.temporal[i];
                (weighted * factors.capacity[i]).clamp(0.0, 1.0)
            })
            .collect()
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_config()
    }
}

/// Indices of the `k` best positive scores, best first, ties in input order
pub fn select_top_k(scores: &[f64], k: usize) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..scores.len()).filter(|&i| scores[i] > 0.0).collect();
    // Vec::sort_by is stable
    ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    ranked.truncate(k);
    ranked
}

/// Coordinates must be finite and within degree range
fn validate_point(record: &str, what: &str, point: GeoPoint) -> Result<(), MatchError> {
    if !point.is_finite() {
        return Err(MatchError::invalid_input(record, format!("{} coordinates are not finite", what)));
    }
    if !point.in_degree_range() {
        return Err(MatchError::invalid_input(
            record,
            format!("{} coordinates ({}, {}) are out of degree range", what, point.lat, point.lon),
        ));
    }
    Ok(())
}

fn validate_request(request: &ShipmentRequest) -> Result<(), MatchError> {
    let record = format!("request {}", request.request_id);
    validate_point(&record, "pickup", request.pickup)?;
    validate_point(&record, "dropoff", request.dropoff)?;
    if !request.required_capacity.is_finite() || request.required_capacity < 0.0 {
        return Err(MatchError::invalid_input(
            &record,
            format!("required capacity {} is invalid", request.required_capacity),
        ));
    }
    Ok(())
}

fn validate_transporter(transporter: &Transporter) -> Result<(), MatchError> {
    let record = format!("transporter {}", transporter.transporter_id);
    validate_point(&record, "current", transporter.current)?;
    if let Some(home_base) = transporter.home_base {
        validate_point(&record, "home base", home_base)?;
    }
    if let Some(capacity) = transporter.available_capacity {
        if !capacity.is_finite() || capacity < 0.0 {
            return Err(MatchError::invalid_input(
                &record,
                format!("available capacity {} is invalid", capacity),
            ));
        }
    }
    Ok(())
}
