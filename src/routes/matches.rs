use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{MatchError, Matcher};
use crate::models::{parse_date, CustomMatchRequest, ErrorResponse, HealthResponse, MatchResponse, ShipmentRequest};
use crate::services::{Dataset, Gazetteer};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub matcher: Arc<Matcher>,
    pub gazetteer: Arc<Gazetteer>,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/requests", web::get().to(list_requests))
        .route("/transporters", web::get().to(list_transporters))
        .route("/matches/custom", web::post().to(match_custom))
        .route("/matches/{request_id}", web::get().to(match_request));
}

fn error_response(status: u16, error: &str, message: impl Into<String>) -> HttpResponse {
    let body = ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: status,
    };
    match status {
        400 => HttpResponse::BadRequest().json(body),
        404 => HttpResponse::NotFound().json(body),
        422 => HttpResponse::UnprocessableEntity().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        transporters: state.dataset.transporters.len(),
        requests: state.dataset.requests.len(),
    })
}

/// GET /api/v1/requests
async fn list_requests(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(&state.dataset.requests)
}

/// GET /api/v1/transporters
async fn list_transporters(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(&state.dataset.transporters)
}

/// Score a request against the loaded transporter table off the async workers
async fn run_match(state: &AppState, request: ShipmentRequest) -> HttpResponse {
    let matcher = Arc::clone(&state.matcher);
    let dataset = Arc::clone(&state.dataset);
    let request_id = request.request_id.clone();

    let outcome = web::block(move || matcher.find_matches(&request, &dataset.transporters)).await;

    match outcome {
        Ok(Ok(result)) => {
            tracing::info!(
                "Returning {} matches for request {} (from {} candidates)",
                result.matches.len(),
                request_id,
                result.total_candidates
            );
            HttpResponse::Ok().json(MatchResponse {
                request_id,
                matches: result.matches,
                total_candidates: result.total_candidates,
            })
        }
        Ok(Err(e @ MatchError::InvalidInput { .. })) => {
            tracing::warn!("Rejected input while matching {}: {}", request_id, e);
            error_response(422, "Invalid input", e.to_string())
        }
        Ok(Err(e)) => {
            tracing::error!("Matching failed for {}: {}", request_id, e);
            error_response(500, "Matching failed", e.to_string())
        }
        Err(e) => {
            tracing::error!("Matching task for {} did not complete: {}", request_id, e);
            error_response(500, "Matching failed", e.to_string())
        }
    }
}

/// Match a request from the loaded dataset
///
/// GET /api/v1/matches/{request_id}
async fn match_request(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let request_id = path.into_inner();
    tracing::info!("Finding matches for request: {}", request_id);

    let Some(request) = state.dataset.find_request(&request_id).cloned() else {
        return error_response(404, "Request not found", format!("Request {} not found", request_id));
    };

    run_match(&state, request).await
}

/// Match a form-entered request
///
/// POST /api/v1/matches/custom
///
/// Request body:
/// ```json
/// {
///   "pickup_city": "Kano",
///   "dropoff_city": "Lagos",
///   "crop_type": "Maize",
///   "required_capacity": 20,
///   "requested_date": "2024-06-10"
/// }
/// ```
async fn match_custom(
    state: web::Data<AppState>,
    req: web::Json<CustomMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for custom match request: field_errors={:?}", errors);
        return error_response(400, "Validation failed", errors.to_string());
    }

    let (Some(pickup), Some(dropoff)) = (
        state.gazetteer.lookup(&req.pickup_city),
        state.gazetteer.lookup(&req.dropoff_city),
    ) else {
        return error_response(
            400,
            "Invalid city selected",
            format!("Unknown city in {} -> {}", req.pickup_city, req.dropoff_city),
        );
    };

    let requested_date = match req.requested_date.as_deref() {
        None => None,
        Some(raw) => match parse_date(raw) {
            Some(date) => Some(date),
            None => {
                return error_response(400, "Invalid date", format!("Cannot parse requested_date '{}'", raw));
            }
        },
    };

    let req = req.into_inner();
    let mut request = ShipmentRequest::new(
        format!("CUSTOM-{}", uuid::Uuid::new_v4()),
        pickup,
        dropoff,
        req.required_capacity,
        req.crop_type,
    );
    request.pickup_city = Some(req.pickup_city);
    request.dropoff_city = Some(req.dropoff_city);
    request.requested_date = requested_date;

    run_match(&state, request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use crate::models::{GeoPoint, Transporter};

    fn create_state() -> AppState {
        let mut transporter = Transporter::new("DRV0001", GeoPoint::new(12.0022, 8.5920));
        transporter.home_base = Some(GeoPoint::new(6.5244, 3.3792));
        transporter.available_capacity = Some(30.0);
        transporter.allowed_cargo = Some(vec!["Maize".to_string()]);

        let request = ShipmentRequest::new(
            "REQ0001",
            GeoPoint::new(12.0022, 8.5920),
            GeoPoint::new(6.5244, 3.3792),
            20.0,
            "Maize",
        );

        AppState {
            dataset: Arc::new(Dataset {
                transporters: vec![transporter],
                requests: vec![request],
            }),
            matcher: Arc::new(Matcher::default()),
            gazetteer: Arc::new(Gazetteer::default()),
        }
    }

    #[actix_web::test]
    async fn test_health_check_response() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: HealthResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.status, "healthy");
        assert_eq!(body.transporters, 1);
        assert_eq!(body.requests, 1);
    }

    #[actix_web::test]
    async fn test_match_known_request() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/matches/REQ0001").to_request();
        let body: MatchResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.request_id, "REQ0001");
        assert_eq!(body.matches.len(), 1);
        assert_eq!(body.matches[0].transporter_id, "DRV0001");
    }

    #[actix_web::test]
    async fn test_unknown_request_is_404() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/matches/REQ9999").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn test_custom_match_unknown_city_is_400() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/matches/custom")
            .set_json(serde_json::json!({
                "pickup_city": "Accra",
                "dropoff_city": "Lagos",
                "crop_type": "Maize",
                "required_capacity": 10.0
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_list_requests_and_transporters() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/requests").to_request();
        let requests: Vec<ShipmentRequest> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].request_id, "REQ0001");

        let req = test::TestRequest::get().uri("/transporters").to_request();
        let transporters: Vec<Transporter> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(transporters.len(), 1);
        assert_eq!(transporters[0].transporter_id, "DRV0001");
    }

    #[actix_web::test]
    async fn test_invalid_transporter_is_422() {
        let mut state = create_state();
        let mut stray = Transporter::new("DRV0002", GeoPoint::new(95.0, 8.5920));
        stray.available_capacity = Some(30.0);
        state.dataset = Arc::new(Dataset {
            transporters: vec![state.dataset.transporters[0].clone(), stray],
            requests: state.dataset.requests.clone(),
        });

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/matches/REQ0001").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 422);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.status_code, 422);
        assert!(body.message.contains("DRV0002"));
    }

    #[actix_web::test]
    async fn test_custom_match_bad_date_is_400() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/matches/custom")
            .set_json(serde_json::json!({
                "pickup_city": "Kano",
                "dropoff_city": "Lagos",
                "crop_type": "Maize",
                "required_capacity": 10.0,
                "requested_date": "next tuesday"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "Invalid date");
    }

    #[actix_web::test]
    async fn test_custom_match_resolves_cities() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/matches/custom")
            .set_json(serde_json::json!({
                "pickup_city": "Kano",
                "dropoff_city": "Lagos",
                "crop_type": "Maize",
                "required_capacity": 10.0
            }))
            .to_request();
        let body: MatchResponse = test::call_and_read_body_json(&app, req).await;

        assert!(body.request_id.starts_with("CUSTOM-"));
        assert_eq!(body.matches.len(), 1);
        assert!(body.matches[0].final_score > 0.9);
    }
}
