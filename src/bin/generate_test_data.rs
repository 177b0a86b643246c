/// Test data generator for UzoAgro Match
///
/// Generates `drivers.csv` and `requests.csv` with realistic Nigerian routes,
/// standard truck tonnages and the default cargo taxonomy. The output is
/// deterministic for a given seed.
///
/// Run: cargo run --bin generate-test-data -- --out-dir data --drivers 50 --requests 100

use chrono::{Duration, Local};
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use uzoagro_match::core::cargo::default_categories;
use uzoagro_match::services::gazetteer::DEFAULT_CITIES;

#[derive(Parser, Debug)]
#[command(name = "generate-test-data")]
#[command(about = "Generate synthetic driver and request CSVs")]
struct Args {
    /// Directory that receives drivers.csv and requests.csv
    #[arg(long, default_value = "data")]
    out_dir: PathBuf,

    /// Number of driver rows
    #[arg(long, default_value = "50")]
    drivers: usize,

    /// Number of request rows
    #[arg(long, default_value = "100")]
    requests: usize,

    /// RNG seed
    #[arg(long, default_value = "42")]
    seed: u64,
}

const FIRST_NAMES: &[&str] = &[
    "Chukwuemeka", "Aisha", "Emeka", "Ngozi", "Ahmed", "Ifeanyi", "Fatima", "Samuel", "Tunde",
    "Amaka", "Ibrahim", "Uche", "Bala",
];
const LAST_NAMES: &[&str] = &[
    "Okonkwo", "Ibrahim", "Eze", "Abiola", "Ogunleye", "Chukwu", "Nwosu", "Balogun", "Adeniyi",
    "Uba", "Okafor", "Bello", "Adeyemi",
];
const PHONE_PREFIXES: &[&str] = &["080", "081", "090", "070"];
const STANDARD_TONNAGES: &[u32] = &[5, 10, 15, 20, 30, 45];

const DRIVER_COLUMNS: [&str; 12] = [
    "driver_id", "name", "phone", "current_city", "current_lat", "current_lon",
    "home_base_city", "home_base_lat", "home_base_lon", "available_date",
    "available_capacity", "allowed_crops",
];
const REQUEST_COLUMNS: [&str; 12] = [
    "request_id", "sender_name", "phone", "pickup_city", "pickup_lat", "pickup_lon",
    "dropoff_city", "dropoff_lat", "dropoff_lon", "requested_date",
    "required_capacity", "crop_type",
];

type City = (&'static str, f64, f64);

struct Generator {
    rng: StdRng,
    phones: std::collections::HashSet<String>,
    categories: Vec<Vec<String>>,
}

impl Generator {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            phones: Default::default(),
            categories: default_categories().into_iter().map(|c| c.labels).collect(),
        }
    }

    fn name(&mut self) -> String {
        let first = FIRST_NAMES.choose(&mut self.rng).copied().unwrap_or("Ade");
        let last = LAST_NAMES.choose(&mut self.rng).copied().unwrap_or("Okafor");
        format!("{} {}", first, last)
    }

    fn phone(&mut self) -> String {
        for _ in 0..1000 {
            let prefix = PHONE_PREFIXES.choose(&mut self.rng).copied().unwrap_or("080");
            let phone = format!("{}{:08}", prefix, self.rng.random_range(10_000_000..100_000_000u32));
            if self.phones.insert(phone.clone()) {
                return phone;
            }
        }
        format!("080{:08}", self.rng.random_range(10_000_000..100_000_000u32))
    }

    fn date_within(&mut self, days: i64) -> String {
        let offset = self.rng.random_range(0..=days);
        (Local::now().date_naive() + Duration::days(offset))
            .format("%Y-%m-%d")
            .to_string()
    }

    /// Two distinct cities
    fn route(&mut self) -> (City, City) {
        let from = *DEFAULT_CITIES.choose(&mut self.rng).unwrap_or(&DEFAULT_CITIES[0]);
        let others: Vec<City> = DEFAULT_CITIES.iter().copied().filter(|c| c.0 != from.0).collect();
        let to = *others.choose(&mut self.rng).unwrap_or(&from);
        (from, to)
    }

    fn tonnage(&mut self) -> u32 {
        *STANDARD_TONNAGES.choose(&mut self.rng).unwrap_or(&10)
    }

    /// Drivers usually stick to one to three labels from a single category
    fn driver_crops(&mut self) -> String {
        let category = self.categories[self.rng.random_range(0..self.categories.len())].clone();
        let count = self.rng.random_range(1..=3).min(category.len());
        category
            .choose_multiple(&mut self.rng, count)
            .cloned()
            .collect::<Vec<_>>()
            .join("|")
    }

    fn any_crop(&mut self) -> String {
        let all: Vec<&String> = self.categories.iter().flatten().collect();
        all.choose(&mut self.rng).map(|s| s.to_string()).unwrap_or_default()
    }

    fn driver_row(&mut self, i: usize) -> Vec<String> {
        let (current, home) = self.route();
        vec![
            format!("DRV{:04}", i),
            self.name(),
            self.phone(),
            current.0.to_string(),
            current.1.to_string(),
            current.2.to_string(),
            home.0.to_string(),
            home.1.to_string(),
            home.2.to_string(),
            self.date_within(4),
            self.tonnage().to_string(),
            self.driver_crops(),
        ]
    }

    fn request_row(&mut self, i: usize) -> Vec<String> {
        let (pickup, dropoff) = self.route();
        vec![
            format!("REQ{:04}", i),
            self.name(),
            self.phone(),
            pickup.0.to_string(),
            pickup.1.to_string(),
            pickup.2.to_string(),
            dropoff.0.to_string(),
            dropoff.1.to_string(),
            dropoff.2.to_string(),
            self.date_within(4),
            self.tonnage().to_string(),
            self.any_crop(),
        ]
    }
}

fn write_csv(path: &Path, columns: &[&str], rows: &[Vec<String>]) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(columns)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let out_dir = args.out_dir.as_path();
    fs::create_dir_all(out_dir)?;

    let mut generator = Generator::new(args.seed);
    let drivers: Vec<Vec<String>> = (1..=args.drivers).map(|i| generator.driver_row(i)).collect();
    let requests: Vec<Vec<String>> = (1..=args.requests).map(|i| generator.request_row(i)).collect();

    write_csv(&out_dir.join("drivers.csv"), &DRIVER_COLUMNS, &drivers)?;
    write_csv(&out_dir.join("requests.csv"), &REQUEST_COLUMNS, &requests)?;

    println!(
        "Generated {} drivers and {} requests in {}",
        drivers.len(),
        requests.len(),
        out_dir.display()
    );
    Ok(())
}
