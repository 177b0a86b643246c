use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::{
    cargo::{default_categories, default_safe_pivots, CargoCategory, CargoTaxonomy},
    matcher::DEFAULT_TOP_K,
    scoring::DEFAULT_TEMPORAL_STEPS,
    MatchError, MatchingConfig,
};
use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }

/// Dataset file locations
#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_transporters_path")]
    pub transporters_path: String,
    #[serde(default = "default_requests_path")]
    pub requests_path: String,
    #[serde(default = "default_matches_path")]
    pub matches_path: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            transporters_path: default_transporters_path(),
            requests_path: default_requests_path(),
            matches_path: default_matches_path(),
        }
    }
}

fn default_transporters_path() -> String { "data/drivers.csv".to_string() }
fn default_requests_path() -> String { "data/requests.csv".to_string() }
fn default_matches_path() -> String { "data/matches.csv".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default = "default_temporal_steps")]
    pub temporal_steps: Vec<f64>,
    #[serde(default = "default_categories")]
    pub categories: Vec<CargoCategory>,
    #[serde(default = "default_pivot_pairs")]
    pub safe_pivots: Vec<[String; 2]>,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            weights: WeightsConfig::default(),
            temporal_steps: default_temporal_steps(),
            categories: default_categories(),
            safe_pivots: default_pivot_pairs(),
        }
    }
}

fn default_top_k() -> usize { DEFAULT_TOP_K }
fn default_temporal_steps() -> Vec<f64> { DEFAULT_TEMPORAL_STEPS.to_vec() }

fn default_pivot_pairs() -> Vec<[String; 2]> {
    default_safe_pivots().into_iter().map(|(a, b)| [a, b]).collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_deadhead_weight")]
    pub deadhead: f64,
    #[serde(default = "default_corridor_weight")]
    pub corridor: f64,
    #[serde(default = "default_affinity_weight")]
    pub affinity: f64,
    #[serde(default = "default_temporal_weight")]
    pub temporal: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            deadhead: default_deadhead_weight(),
            corridor: default_corridor_weight(),
            affinity: default_affinity_weight(),
            temporal: default_temporal_weight(),
        }
    }
}

fn default_deadhead_weight() -> f64 { 0.25 }
fn default_corridor_weight() -> f64 { 0.35 }
fn default_affinity_weight() -> f64 { 0.20 }
fn default_temporal_weight() -> f64 { 0.20 }

impl From<&WeightsConfig> for ScoringWeights {
    fn from(w: &WeightsConfig) -> Self {
        Self {
            deadhead: w.deadhead,
            corridor: w.corridor,
            affinity: w.affinity,
            temporal: w.temporal,
        }
    }
}

impl MatchingSettings {
    /// Build the engine configuration, validating taxonomy and weights
    pub fn to_matching_config(&self) -> Result<MatchingConfig, MatchError> {
        let taxonomy = CargoTaxonomy::new(
            self.categories.clone(),
            self.safe_pivots
                .iter()
                .map(|[a, b]| (a.clone(), b.clone()))
                .collect(),
        )?;

        let config = MatchingConfig {
            weights: ScoringWeights::from(&self.weights),
            top_k: self.top_k,
            taxonomy,
            temporal_steps: self.temporal_steps.clone(),
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with UZOAGRO_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Local overrides for development
            .add_source(File::with_name("config/local").required(false))
            // e.g., UZOAGRO__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("UZOAGRO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("UZOAGRO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the short-form dataset path variables
///
/// `TRANSPORTERS_CSV`, `REQUESTS_CSV` and `MATCHES_CSV` win over both the
/// config files and the prefixed variables.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("TRANSPORTERS_CSV", "data.transporters_path"),
        ("REQUESTS_CSV", "data.requests_path"),
        ("MATCHES_CSV", "data.matches_path"),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.deadhead, 0.25);
        assert_eq!(weights.corridor, 0.35);
        assert_eq!(weights.affinity, 0.20);
        assert_eq!(weights.temporal, 0.20);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_default_matching_config_is_valid() {
        let config = MatchingSettings::default().to_matching_config().unwrap();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.temporal_steps, vec![1.0, 0.8, 0.4]);
        assert_eq!(config.taxonomy.category("Cassava"), "Tubers");
    }

    #[test]
    fn test_bad_weights_rejected() {
        let mut settings = MatchingSettings::default();
        settings.weights.affinity = 0.5;
        assert!(settings.to_matching_config().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9100

[matching]
top_k = 5
temporal_steps = [1.0, 0.5]
safe_pivots = [["Tubers", "Perishables"]]

[[matching.categories]]
name = "Grains"
labels = ["Rice", "Maize"]

[[matching.categories]]
name = "Tubers"
labels = ["Yam"]

[[matching.categories]]
name = "Perishables"
labels = ["Tomatoes"]
"#
        )
        .unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.data.requests_path, "data/requests.csv");

        let config = settings.matching.to_matching_config().unwrap();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.taxonomy.affinity_score("Tomatoes", &["Yam".to_string()]), 0.4);
        assert_eq!(config.taxonomy.affinity_score("Rice", &["Yam".to_string()]), 0.0);
    }
}
