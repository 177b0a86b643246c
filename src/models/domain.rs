use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Latitude within [-90, 90] and longitude within [-180, 180]
    pub fn in_degree_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(p: GeoPoint) -> Self {
        geo::Point::new(p.lon, p.lat)
    }
}

impl From<GeoPoint> for geo::Coord<f64> {
    fn from(p: GeoPoint) -> Self {
        geo::Coord { x: p.lon, y: p.lat }
    }
}

/// Candidate transporter (one row of the driver table)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transporter {
    pub transporter_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub current_city: Option<String>,
    pub current: GeoPoint,
    #[serde(default)]
    pub home_base_city: Option<String>,
    #[serde(default)]
    pub home_base: Option<GeoPoint>,
    #[serde(default)]
    pub available_capacity: Option<f64>,
    #[serde(default)]
    pub available_date: Option<NaiveDate>,
    #[serde(default)]
    pub allowed_cargo: Option<Vec<String>>,
}

impl Transporter {
    /// Minimal transporter with only the required fields set
    pub fn new(transporter_id: impl Into<String>, current: GeoPoint) -> Self {
        Self {
            transporter_id: transporter_id.into(),
            name: None,
            phone: None,
            current_city: None,
            current,
            home_base_city: None,
            home_base: None,
            available_capacity: None,
            available_date: None,
            allowed_cargo: None,
        }
    }

    /// Home base, falling back to the current position when unknown
    pub fn home_base_or_current(&self) -> GeoPoint {
        self.home_base.unwrap_or(self.current)
    }

    /// Available capacity, defaulting to zero
    pub fn capacity(&self) -> f64 {
        self.available_capacity.unwrap_or(0.0)
    }

    pub fn allowed_labels(&self) -> &[String] {
        self.allowed_cargo.as_deref().unwrap_or(&[])
    }
}

/// A farmer's request to move cargo from pickup to dropoff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentRequest {
    pub request_id: String,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub pickup_city: Option<String>,
    pub pickup: GeoPoint,
    #[serde(default)]
    pub dropoff_city: Option<String>,
    pub dropoff: GeoPoint,
    pub required_capacity: f64,
    #[serde(default)]
    pub requested_date: Option<NaiveDate>,
    pub cargo_type: String,
}

impl ShipmentRequest {
    pub fn new(
        request_id: impl Into<String>,
        pickup: GeoPoint,
        dropoff: GeoPoint,
        required_capacity: f64,
        cargo_type: impl Into<String>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            sender_name: None,
            phone: None,
            pickup_city: None,
            pickup,
            dropoff_city: None,
            dropoff,
            required_capacity,
            requested_date: None,
            cargo_type: cargo_type.into(),
        }
    }
}

/// Scored pairing of a request and a transporter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub request_id: String,
    #[serde(rename = "driver_id")]
    pub transporter_id: String,
    pub final_score: f64,
    pub capacity_score: f64,
    pub time_score: f64,
    pub affinity_score: f64,
    pub deadhead_score: f64,
    pub corridor_score: f64,
}

/// Composite ranking weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub deadhead: f64,
    pub corridor: f64,
    pub affinity: f64,
    pub temporal: f64,
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.deadhead + self.corridor + self.affinity + self.temporal
    }

    fn all(&self) -> [f64; 4] {
        [self.deadhead, self.corridor, self.affinity, self.temporal]
    }

    pub fn is_valid(&self) -> bool {
        self.all().iter().all(|w| w.is_finite() && *w >= 0.0) && (self.sum() - 1.0).abs() <= 1e-6
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            deadhead: 0.25,
            corridor: 0.35,
            affinity: 0.20,
            temporal: 0.20,
        }
    }
}

/// Parse a dataset date, tolerating a trailing time component.
///
/// Unparseable input yields `None` rather than an error.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
