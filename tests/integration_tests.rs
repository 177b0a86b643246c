// Integration tests for UzoAgro Match

use chrono::NaiveDate;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use uzoagro_match::core::{MatchError, Matcher, MatchingConfig};
use uzoagro_match::models::{GeoPoint, ShipmentRequest, Transporter};
use uzoagro_match::services::dataset::{load_requests, load_transporters, write_matches, Dataset};

fn date(day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 7, day)
}

fn create_transporter(
    id: &str,
    current: (f64, f64),
    home: (f64, f64),
    capacity: f64,
    crops: &[&str],
) -> Transporter {
    let mut t = Transporter::new(id, GeoPoint::new(current.0, current.1));
    t.home_base = Some(GeoPoint::new(home.0, home.1));
    t.available_capacity = Some(capacity);
    t.available_date = date(15);
    t.allowed_cargo = Some(crops.iter().map(|c| c.to_string()).collect());
    t
}

fn create_request(id: &str, pickup: (f64, f64), dropoff: (f64, f64), capacity: f64, crop: &str) -> ShipmentRequest {
    let mut r = ShipmentRequest::new(
        id,
        GeoPoint::new(pickup.0, pickup.1),
        GeoPoint::new(dropoff.0, dropoff.1),
        capacity,
        crop,
    );
    r.requested_date = date(15);
    r
}

/// A deterministic spread of transporters around south-west Nigeria
fn create_fleet(n: usize) -> Vec<Transporter> {
    let crops: [&[&str]; 4] = [&["Maize"], &["Rice", "Beans"], &["Yam"], &["Tomatoes", "Onions"]];
    (0..n)
        .map(|i| {
            let f = i as f64;
            let mut t = create_transporter(
                &format!("DRV{:04}", i + 1),
                (6.0 + (f * 0.37) % 6.0, 3.0 + (f * 0.53) % 5.0),
                (12.0 - (f * 0.29) % 6.0, 8.5 - (f * 0.41) % 5.0),
                [5.0, 10.0, 15.0, 20.0, 30.0, 45.0][i % 6],
                crops[i % 4],
            );
            t.available_date = date(13 + (i % 5) as u32);
            t
        })
        .collect()
}

#[test]
fn test_integration_perfect_single_transporter() {
    let matcher = Matcher::with_default_config();
    let transporters = vec![create_transporter("T1", (6.5, 3.4), (12.0, 8.6), 30.0, &["Maize"])];
    let request = create_request("R1", (6.5, 3.4), (12.0, 8.6), 20.0, "Maize");

    let result = matcher.find_matches(&request, &transporters).unwrap();

    assert_eq!(result.matches.len(), 1);
    let m = &result.matches[0];
    assert_eq!(m.request_id, "R1");
    assert_eq!(m.capacity_score, 1.0);
    assert_eq!(m.time_score, 1.0);
    assert_eq!(m.affinity_score, 1.0);
    assert_eq!(m.deadhead_score, 1.0);
    assert_eq!(m.corridor_score, 1.0);
    assert!((m.final_score - 1.0).abs() < 1e-9);
}

#[test]
fn test_integration_capacity_gate() {
    let matcher = Matcher::with_default_config();
    let transporters = vec![
        // Geometrically perfect but too small
        create_transporter("T2", (6.5, 3.4), (12.0, 8.6), 10.0, &["Maize"]),
        create_transporter("T3", (9.0, 5.0), (7.0, 7.0), 20.0, &["Yam"]),
    ];
    let request = create_request("R1", (6.5, 3.4), (12.0, 8.6), 20.0, "Maize");

    let result = matcher.find_matches(&request, &transporters).unwrap();

    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].transporter_id, "T3");
    assert_eq!(result.matches[0].affinity_score, 0.4);
}

#[test]
fn test_integration_all_capacity_gated_is_empty() {
    let matcher = Matcher::with_default_config();
    let transporters = vec![
        create_transporter("T1", (6.5, 3.4), (12.0, 8.6), 5.0, &["Maize"]),
        create_transporter("T2", (7.5, 3.4), (12.0, 8.6), 10.0, &["Maize"]),
    ];
    let request = create_request("R1", (6.5, 3.4), (12.0, 8.6), 45.0, "Maize");

    assert!(matcher.find_matches(&request, &transporters).unwrap().matches.is_empty());
}

#[test]
fn test_integration_ranking_properties() {
    let matcher = Matcher::with_default_config();
    let fleet = create_fleet(60);
    let requests = [
        create_request("R1", (6.5244, 3.3792), (12.0022, 8.5920), 10.0, "Maize"),
        create_request("R2", (9.0765, 7.3986), (4.8156, 7.0498), 20.0, "Cassava"),
        create_request("R3", (7.3775, 3.9470), (10.5105, 7.4165), 5.0, "Peppers"),
        create_request("R4", (8.4799, 4.5418), (6.2100, 7.0700), 30.0, "Cocoa"),
    ];

    for request in &requests {
        let factors = matcher.score_factors(request, &fleet);
        let composite = matcher.composite_scores(&factors);
        assert_eq!(factors.len(), fleet.len());

        for i in 0..fleet.len() {
            for score in [
                factors.capacity[i],
                factors.temporal[i],
                factors.affinity[i],
                factors.deadhead[i],
                factors.corridor[i],
                composite[i],
            ] {
                assert!((0.0..=1.0).contains(&score), "score {} out of range", score);
            }
            assert!(factors.capacity[i] == 0.0 || factors.capacity[i] == 1.0);
            if factors.capacity[i] == 0.0 {
                assert_eq!(composite[i], 0.0);
            }
        }

        let result = matcher.find_matches(request, &fleet).unwrap();
        assert!(result.matches.len() <= 3);
        assert!(result.matches.iter().all(|m| m.final_score > 0.0));
        for pair in result.matches.windows(2) {
            assert!(pair[0].final_score >= pair[1].final_score);
        }
    }
}

#[test]
fn test_integration_unknown_cargo_has_zero_affinity() {
    let matcher = Matcher::with_default_config();
    let fleet = create_fleet(12);
    let request = create_request("R1", (6.5, 3.4), (9.0, 7.4), 5.0, "Cocoa");

    let result = matcher.find_matches(&request, &fleet).unwrap();
    assert!(!result.matches.is_empty());
    assert!(result.matches.iter().all(|m| m.affinity_score == 0.0));
}

#[test]
fn test_integration_ties_keep_table_order() {
    let matcher = Matcher::with_default_config();
    let transporters: Vec<Transporter> = ["A", "B", "C", "D"]
        .iter()
        .map(|id| create_transporter(id, (6.5, 3.4), (12.0, 8.6), 30.0, &["Maize"]))
        .collect();
    let request = create_request("R1", (7.0, 4.0), (11.0, 8.0), 20.0, "Maize");

    let result = matcher.find_matches(&request, &transporters).unwrap();
    let ids: Vec<&str> = result.matches.iter().map(|m| m.transporter_id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
}

#[test]
fn test_integration_custom_top_k() {
    let config = MatchingConfig {
        top_k: 10,
        ..MatchingConfig::default()
    };
    let matcher = Matcher::new(config).unwrap();
    let fleet = create_fleet(30);
    let request = create_request("R1", (6.5, 3.4), (9.0, 7.4), 0.0, "Rice");

    let result = matcher.find_matches(&request, &fleet).unwrap();
    assert_eq!(result.matches.len(), 10);
}

#[test]
fn test_integration_invalid_transporter_fails_fast() {
    let matcher = Matcher::with_default_config();
    let mut fleet = create_fleet(5);
    fleet[3].available_capacity = Some(f64::INFINITY);
    let request = create_request("R1", (6.5, 3.4), (9.0, 7.4), 5.0, "Rice");

    match matcher.find_matches(&request, &fleet) {
        Err(MatchError::InvalidInput { record, .. }) => assert_eq!(record, "transporter DRV0004"),
        other => panic!("expected InvalidInput, got {:?}", other),
    }
}

#[test]
fn test_integration_csv_round_trip() {
    let mut drivers = NamedTempFile::new().unwrap();
    // Files written by spreadsheet tools often carry a BOM
    write!(
        drivers,
        "\u{feff}driver_id,name,phone,current_city,current_lat,current_lon,home_base_city,home_base_lat,home_base_lon,available_date,available_capacity,allowed_crops\n\
         DRV0001,Tunde Balogun,08011111111,Ibadan,7.3775,3.947,Kano,12.0022,8.592,2024-07-15,30,Maize|Rice\n\
         DRV0002,Ngozi Eze,08122222222,Lagos,6.5244,3.3792,Enugu,6.4402,7.4943,2024-07-16,10,Tomatoes\n"
    )
    .unwrap();

    let mut requests = NamedTempFile::new().unwrap();
    write!(
        requests,
        "request_id,sender_name,phone,pickup_city,pickup_lat,pickup_lon,dropoff_city,dropoff_lat,dropoff_lon,requested_date,required_capacity,crop_type\n\
         REQ0001,Bala Uba,09033333333,Ibadan,7.3775,3.947,Kaduna,10.5105,7.4165,2024-07-15,20,Maize\n"
    )
    .unwrap();

    let dataset = Dataset::load(drivers.path(), requests.path()).unwrap();
    assert_eq!(dataset.transporters.len(), 2);
    assert_eq!(dataset.transporters[0].transporter_id, "DRV0001");
    assert!(dataset.find_request("REQ0001").is_some());

    let matches = Matcher::with_default_config()
        .match_all(&dataset.requests, &dataset.transporters)
        .unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].transporter_id, "DRV0001");

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("matches.csv");
    write_matches(&out, &matches).unwrap();

    let written = std::fs::read_to_string(&out).unwrap();
    let mut lines = written.lines();
    assert_eq!(
        lines.next(),
        Some("request_id,driver_id,final_score,capacity_score,time_score,affinity_score,deadhead_score,corridor_score")
    );
    assert!(lines.next().unwrap().starts_with("REQ0001,DRV0001,"));
}

#[test]
fn test_integration_empty_matches_still_write_header() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("matches.csv");
    write_matches(&out, &[]).unwrap();
    assert_eq!(std::fs::read_to_string(&out).unwrap().lines().count(), 1);
}

#[test]
fn test_integration_missing_file() {
    assert!(load_transporters("/nonexistent/drivers.csv").is_err());
    assert!(load_requests("/nonexistent/requests.csv").is_err());
}
