use chrono::NaiveDate;

/// Ranges narrower than this are treated as "all equal"
const NORMALIZE_EPSILON: f64 = 1e-12;

/// Default temporal step table: index is the day gap
pub const DEFAULT_TEMPORAL_STEPS: [f64; 3] = [1.0, 0.8, 0.4];

/// Calculate temporal fit (0-1) from the gap between availability and request
///
/// The absolute day difference indexes into `steps`; gaps past the end of the
/// table score 0.0. An unspecified request date never penalises anyone, while
/// a transporter with no availability date cannot be placed and scores 0.0.
#[inline]
pub fn temporal_score(
    available_date: Option<NaiveDate>,
    requested_date: Option<NaiveDate>,
    steps: &[f64],
) -> f64 {
    let Some(requested) = requested_date else {
        return 1.0;
    };
    let Some(available) = available_date else {
        return 0.0;
    };

    let days = (available - requested).num_days().unsigned_abs();
    usize::try_from(days)
        .ok()
        .and_then(|d| steps.get(d).copied())
        .unwrap_or(0.0)
}

/// Rescale a "lower is better" vector to "higher is better" in [0, 1]
///
/// `goodness = 1 - (x - min) / (max - min)`. If every value is (nearly) the
/// same, all entries score 1.0.
pub fn inverse_normalize(values: &[f64]) -> Vec<f64> {
    let Some((min, max)) = min_max(values) else {
        return Vec::new();
    };

    let range = max - min;
    if range <= NORMALIZE_EPSILON {
        return vec![1.0; values.len()];
    }

    values
        .iter()
        .map(|x| (1.0 - (x - min) / range).clamp(0.0, 1.0))
        .collect()
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(values.iter().fold((first, first), |(lo, hi), &x| (lo.min(x), hi.max(x))))
}
