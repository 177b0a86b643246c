use std::collections::HashMap;

use crate::models::GeoPoint;

/// Cities served by the platform, with their coordinates
pub const DEFAULT_CITIES: &[(&str, f64, f64)] = &[
    ("Lagos", 6.5244, 3.3792),
    ("Enugu", 6.4402, 7.4943),
    ("Awka", 6.2100, 7.0700),
    ("Onitsha", 6.1500, 6.7800),
    ("Abuja", 9.0765, 7.3986),
    ("Port Harcourt", 4.8156, 7.0498),
    ("Ibadan", 7.3775, 3.9470),
    ("Kano", 12.0022, 8.5920),
    ("Kaduna", 10.5105, 7.4165),
    ("Ilorin", 8.4799, 4.5418),
];

/// Exact-name lookup from city to coordinates
#[derive(Debug, Clone)]
pub struct Gazetteer {
    cities: HashMap<String, GeoPoint>,
}

impl Gazetteer {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, GeoPoint)>,
        S: Into<String>,
    {
        Self {
            cities: entries.into_iter().map(|(name, p)| (name.into(), p)).collect(),
        }
    }

    pub fn lookup(&self, city: &str) -> Option<GeoPoint> {
        self.cities.get(city).copied()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::new(
            DEFAULT_CITIES
                .iter()
                .map(|&(name, lat, lon)| (name, GeoPoint::new(lat, lon))),
        )
    }
}
