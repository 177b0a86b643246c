/// Batch matcher
///
/// Scores every request in the configured requests CSV against the driver
/// table and writes the top matches per request to the matches CSV.
///
/// Run: cargo run --bin match-batch

use std::error::Error;
use tracing::{error, info};
use uzoagro_match::config::Settings;
use uzoagro_match::core::Matcher;
use uzoagro_match::logging;
use uzoagro_match::services::dataset::{write_matches, Dataset};

fn run(settings: &Settings) -> Result<usize, Box<dyn Error>> {
    let matcher = Matcher::new(settings.matching.to_matching_config()?)?;
    let dataset = Dataset::load(&settings.data.transporters_path, &settings.data.requests_path)?;

    let matches = matcher.match_all(&dataset.requests, &dataset.transporters)?;
    write_matches(&settings.data.matches_path, &matches)?;

    Ok(matches.len())
}

fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    let settings = Settings::load()?;
    logging::init(&settings.logging);

    match run(&settings) {
        Ok(count) => {
            info!("Saved {} matches to {}", count, settings.data.matches_path);
            Ok(())
        }
        Err(e) => {
            error!("Batch matching failed: {}", e);
            Err(e)
        }
    }
}
