//! Request handlers for the API endpoints.

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::config::ScenarioConfig;
use crate::error::SimulationError;
use crate::sim::engine;

use super::types::{ErrorResponse, HealthResponse};

/// Returns the service liveness banner.
///
/// `GET /health` → 200 + `HealthResponse` JSON
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse::current())
}

/// Runs a 24-hour simulation for the posted scenario.
///
/// `POST /simulate` → 200 + `SimulationResult` JSON
/// Invalid scenario → 422 + `ErrorResponse`
/// Internal invariant failure → 500 + `ErrorResponse`
pub async fn post_simulate(Json(config): Json<ScenarioConfig>) -> impl IntoResponse {
    match engine::run_simulation(config) {
        Ok(result) => Ok(Json(result)),
        Err(err @ SimulationError::Config(_)) => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )),
        Err(err) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )),
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::util::ServiceExt;

    use crate::api::router;

    fn json_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_returns_200() {
        let app = router();
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn simulate_with_empty_body_uses_defaults() {
        let app = router();
        let resp = app.oneshot(json_request("/simulate", "{}")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let hours = json["hourly_results"].as_array().unwrap();
        assert_eq!(hours.len(), 24);
        assert!(json["baseline_total_cost"].as_f64().unwrap() > 0.0);
        // Uncertainty disabled by default: forecast fields are null.
        assert!(hours[12]["forecast_solar_kwh"].is_null());
        assert!(hours[12]["forecast_error_pct"].is_null());
    }

    #[tokio::test]
    async fn simulate_with_custom_battery() {
        let app = router();
        let body = r#"{"solar_capacity": 8.0, "battery": {"capacity": 15.0, "initial_soc": 0.3}}"#;
        let resp = app.oneshot(json_request("/simulate", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let first = &json["hourly_results"][0];
        assert_eq!(first["hour"], 0);
        assert_eq!(first["decision_type"], "GRID_SUPPLY");
    }

    #[tokio::test]
    async fn simulate_rejects_inconsistent_battery_band() {
        let app = router();
        let body = r#"{"battery": {"min_soc": 0.9, "max_soc": 0.5, "initial_soc": 0.7}}"#;
        let resp = app.oneshot(json_request("/simulate", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let error = json["error"].as_str().unwrap_or_default();
        assert!(error.contains("battery.min_soc"), "got: {error}");
    }

    #[tokio::test]
    async fn simulate_rejects_unknown_fields() {
        let app = router();
        let resp = app
            .oneshot(json_request("/simulate", r#"{"bogus": 1}"#))
            .await
            .unwrap();
        // serde rejects the payload before the handler runs
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
