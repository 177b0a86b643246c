use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::core::error::MatchError;

/// Category name for labels outside the taxonomy
pub const UNKNOWN_CATEGORY: &str = "Unknown";

pub const EXACT_MATCH_SCORE: f64 = 1.0;
pub const CATEGORY_MATCH_SCORE: f64 = 0.8;
pub const SAFE_PIVOT_SCORE: f64 = 0.4;

/// A named group of interchangeable cargo labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoCategory {
    pub name: String,
    pub labels: Vec<String>,
}

impl CargoCategory {
    pub fn new(name: &str, labels: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// Cargo categories plus the category pairs considered safely substitutable
///
/// Categories must be disjoint: every label maps to exactly one category.
#[derive(Debug, Clone)]
pub struct CargoTaxonomy {
    category_of: HashMap<String, String>,
    safe_pivots: Vec<(String, String)>,
}

impl CargoTaxonomy {
    pub fn new(
        categories: Vec<CargoCategory>,
        safe_pivots: Vec<(String, String)>,
    ) -> Result<Self, MatchError> {
        let mut category_of = HashMap::new();
        let mut names = HashSet::new();

        for category in categories {
            if !names.insert(category.name.clone()) {
                return Err(MatchError::InvalidConfig(format!(
                    "cargo category '{}' declared twice",
                    category.name
                )));
            }
            for label in category.labels {
                if let Some(previous) = category_of.insert(label.clone(), category.name.clone()) {
                    return Err(MatchError::InvalidConfig(format!(
                        "cargo label '{}' belongs to both '{}' and '{}'",
                        label, previous, category.name
                    )));
                }
            }
        }

        for (left, right) in &safe_pivots {
            for side in [left, right] {
                if !names.contains(side) {
                    return Err(MatchError::InvalidConfig(format!(
                        "safe pivot references undeclared category '{}'",
                        side
                    )));
                }
            }
        }

        Ok(Self {
            category_of,
            safe_pivots,
        })
    }

    /// Category of a label, or [`UNKNOWN_CATEGORY`]
    pub fn category(&self, label: &str) -> &str {
        self.category_of
            .get(label)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_CATEGORY)
    }

    fn is_known(&self, label: &str) -> bool {
        self.category_of.contains_key(label)
    }

    fn is_safe_pivot(&self, request_category: &str, carried: &HashSet<&str>) -> bool {
        self.safe_pivots.iter().any(|(left, right)| {
            let pair = [left.as_str(), right.as_str()];
            pair.contains(&request_category) && pair.iter().any(|c| carried.contains(c))
        })
    }

    /// Score how well a transporter's allowed labels suit the requested cargo
    ///
    /// Precedence, first match wins:
    /// 1. exact label carried (1.0)
    /// 2. some carried label in the same category (0.8)
    /// 3. request category pivots safely to a carried category (0.4)
    /// 4. anything else (0.0)
    ///
    /// Transporters with no allowed labels and requests for unknown cargo
    /// always score 0.0.
    pub fn affinity_score(&self, request_label: &str, allowed: &[String]) -> f64 {
        if allowed.is_empty() || !self.is_known(request_label) {
            return 0.0;
        }

        if allowed.iter().any(|label| label == request_label) {
            return EXACT_MATCH_SCORE;
        }

        let request_category = self.category(request_label);
        let carried: HashSet<&str> = allowed.iter().map(|label| self.category(label)).collect();

        if carried.contains(request_category) {
            return CATEGORY_MATCH_SCORE;
        }

        if self.is_safe_pivot(request_category, &carried) {
            return SAFE_PIVOT_SCORE;
        }

        0.0
    }
}

impl Default for CargoTaxonomy {
    fn default() -> Self {
        Self {
            category_of: default_categories()
                .into_iter()
                .flat_map(|c| {
                    let name = c.name;
                    c.labels.into_iter().map(move |l| (l, name.clone()))
                })
                .collect(),
            safe_pivots: default_safe_pivots(),
        }
    }
}

/// Grains, tubers and perishables
pub fn default_categories() -> Vec<CargoCategory> {
    vec![
        CargoCategory::new("Grains", &["Rice", "Maize", "Beans", "Millet", "Sorghum"]),
        CargoCategory::new("Tubers", &["Yam", "Cassava", "Potatoes"]),
        CargoCategory::new("Perishables", &["Tomatoes", "Onions", "Peppers"]),
    ]
}

/// Dry, hardy goods are cross-compatible
pub fn default_safe_pivots() -> Vec<(String, String)> {
    vec![("Grains".to_string(), "Tubers".to_string())]
}

/// Split a pipe-delimited label list, dropping blanks
pub fn parse_label_list(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
