use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::core::cargo::parse_label_list;
use crate::models::{parse_date, GeoPoint, Match, ShipmentRequest, Transporter};

/// Column order of the matches export
pub const MATCH_COLUMNS: [&str; 8] = [
    "request_id",
    "driver_id",
    "final_score",
    "capacity_score",
    "time_score",
    "affinity_score",
    "deadhead_score",
    "corridor_score",
];

/// Errors that can occur while reading or writing dataset files
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row}: missing required field '{field}'")]
    MissingField { row: usize, field: &'static str },
}

/// Raw row of drivers.csv
#[derive(Debug, Deserialize)]
struct DriverRecord {
    driver_id: String,
    name: Option<String>,
    phone: Option<String>,
    current_city: Option<String>,
    current_lat: Option<f64>,
    current_lon: Option<f64>,
    home_base_city: Option<String>,
    home_base_lat: Option<f64>,
    home_base_lon: Option<f64>,
    available_date: Option<String>,
    available_capacity: Option<f64>,
    allowed_crops: Option<String>,
}

/// Raw row of requests.csv
#[derive(Debug, Deserialize)]
struct RequestRecord {
    request_id: String,
    sender_name: Option<String>,
    phone: Option<String>,
    pickup_city: Option<String>,
    pickup_lat: Option<f64>,
    pickup_lon: Option<f64>,
    dropoff_city: Option<String>,
    dropoff_lat: Option<f64>,
    dropoff_lon: Option<f64>,
    requested_date: Option<String>,
    required_capacity: Option<f64>,
    crop_type: Option<String>,
}

fn required<T>(value: Option<T>, row: usize, field: &'static str) -> Result<T, DatasetError> {
    value.ok_or(DatasetError::MissingField { row, field })
}

impl DriverRecord {
    fn into_transporter(self, row: usize) -> Result<Transporter, DatasetError> {
        let current = GeoPoint::new(
            required(self.current_lat, row, "current_lat")?,
            required(self.current_lon, row, "current_lon")?,
        );
        // A half-specified home base is as good as none
        let home_base = match (self.home_base_lat, self.home_base_lon) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        };

        Ok(Transporter {
            transporter_id: self.driver_id,
            name: self.name,
            phone: self.phone,
            current_city: self.current_city,
            current,
            home_base_city: self.home_base_city,
            home_base,
            available_capacity: self.available_capacity,
            available_date: self.available_date.as_deref().and_then(parse_date),
            allowed_cargo: self
                .allowed_crops
                .as_deref()
                .map(parse_label_list)
                .filter(|labels| !labels.is_empty()),
        })
    }
}

impl RequestRecord {
    fn into_request(self, row: usize) -> Result<ShipmentRequest, DatasetError> {
        Ok(ShipmentRequest {
            request_id: self.request_id,
            sender_name: self.sender_name,
            phone: self.phone,
            pickup_city: self.pickup_city,
            pickup: GeoPoint::new(
                required(self.pickup_lat, row, "pickup_lat")?,
                required(self.pickup_lon, row, "pickup_lon")?,
            ),
            dropoff_city: self.dropoff_city,
            dropoff: GeoPoint::new(
                required(self.dropoff_lat, row, "dropoff_lat")?,
                required(self.dropoff_lon, row, "dropoff_lon")?,
            ),
            required_capacity: required(self.required_capacity, row, "required_capacity")?,
            requested_date: self.requested_date.as_deref().and_then(parse_date),
            cargo_type: self.crop_type.unwrap_or_default(),
        })
    }
}

/// Read a CSV file, tolerating a UTF-8 byte order mark
fn read_csv_text(path: &Path) -> Result<String, DatasetError> {
    let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Parse driver rows from CSV text
pub fn parse_transporters(text: &str) -> Result<Vec<Transporter>, DatasetError> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    reader
        .deserialize::<DriverRecord>()
        .enumerate()
        // Header is line 1
        .map(|(i, record)| record?.into_transporter(i + 2))
        .collect()
}

/// Parse request rows from CSV text
pub fn parse_requests(text: &str) -> Result<Vec<ShipmentRequest>, DatasetError> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    reader
        .deserialize::<RequestRecord>()
        .enumerate()
        .map(|(i, record)| record?.into_request(i + 2))
        .collect()
}

pub fn load_transporters<P: AsRef<Path>>(path: P) -> Result<Vec<Transporter>, DatasetError> {
    parse_transporters(&read_csv_text(path.as_ref())?)
}

pub fn load_requests<P: AsRef<Path>>(path: P) -> Result<Vec<ShipmentRequest>, DatasetError> {
    parse_requests(&read_csv_text(path.as_ref())?)
}

/// Write matches as CSV; the header is written even when there are no rows
pub fn write_matches<P: AsRef<Path>>(path: P, matches: &[Match]) -> Result<(), DatasetError> {
    let path = path.as_ref();
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(MATCH_COLUMNS)?;
    for m in matches {
        writer.serialize(m)?;
    }
    writer.flush().map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// In-memory snapshot of both tables, loaded once and shared read-only
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub transporters: Vec<Transporter>,
    pub requests: Vec<ShipmentRequest>,
}

impl Dataset {
    pub fn load<P: AsRef<Path>>(transporters_path: P, requests_path: P) -> Result<Self, DatasetError> {
        let transporters = load_transporters(transporters_path)?;
        let requests = load_requests(requests_path)?;

        tracing::info!(
            "Loaded {} transporters and {} requests",
            transporters.len(),
            requests.len()
        );

        Ok(Self {
            transporters,
            requests,
        })
    }

    pub fn find_request(&self, request_id: &str) -> Option<&ShipmentRequest> {
        self.requests.iter().find(|r| r.request_id == request_id)
    }
}
