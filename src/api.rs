// 🌐 REST API - JSON views over a precomputed dashboard report

use crate::report::DashboardReport;
use crate::rules::Profile;
use crate::segmentation::ScoredCustomer;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state; the report is computed once at start-up
#[derive(Clone)]
pub struct AppState {
    pub report: Arc<DashboardReport>,
}

impl AppState {
    pub fn new(report: DashboardReport) -> Self {
        AppState {
            report: Arc::new(report),
        }
    }
}

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    fn err(data: T, error: String) -> Self {
        Self {
            success: false,
            data,
            error: Some(error),
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/summary - Dataset metadata
async fn get_summary(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.report.summary.clone()))
}

/// GET /api/kpis - Core KPIs
async fn get_kpis(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.report.kpis.clone()))
}

/// GET /api/sales/weekly - Weekly sales trend
async fn get_weekly_sales(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.report.weekly_sales.clone()))
}

/// GET /api/rfm - Scored customer table
async fn get_rfm(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.report.segmentation.customers.clone()))
}

/// GET /api/quantiles - Quartile cut points per metric
async fn get_quantiles(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.report.segmentation.thresholds))
}

/// GET /api/profiles - Customers and mean metrics per profile
async fn get_profiles(State(state): State<AppState>) -> impl IntoResponse {
    #[derive(Serialize)]
    struct ProfilesResponse<'a> {
        counts: &'a [crate::segmentation::ProfileCount],
        means: &'a [crate::segmentation::ProfileMeans],
    }

    Json(ApiResponse::ok(ProfilesResponse {
        counts: &state.report.profile_counts,
        means: &state.report.profile_means,
    }))
    .into_response()
}

/// GET /api/profiles/:profile - Customers in one or more profiles
///
/// Accepts `all` or a comma-separated list such as `champion,at_risk`.
async fn filter_profiles(State(state): State<AppState>, Path(filter): Path<String>) -> Response {
    let profiles: Result<Vec<Profile>, String> = if filter == "all" {
        Ok(Vec::new())
    } else {
        filter.split(',').map(|p| p.trim().parse::<Profile>()).collect()
    };

    match profiles {
        Ok(profiles) => {
            let customers: Vec<ScoredCustomer> = state
                .report
                .segmentation
                .filter_by_profiles(&profiles)
                .into_iter()
                .cloned()
                .collect();
            (StatusCode::OK, Json(ApiResponse::ok(customers))).into_response()
        }
        Err(e) => {
            tracing::warn!("Rejected profile filter {}: {}", filter, e);
            (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::err(Vec::<ScoredCustomer>::new(), e)),
            )
                .into_response()
        }
    }
}

/// GET /api/heatmap - Mean monetary value per (R, F) cell
async fn get_heatmap(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.report.heatmap.clone()))
}

/// GET /api/retention - Monthly retention trend
async fn get_retention(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.report.retention.clone()))
}

/// GET /api/insights - Narrative insights
async fn get_insights(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.report.insights.clone()))
}

/// GET /api/quality - Data quality report
async fn get_quality(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.report.quality.clone()))
}

/// GET /api/report - Everything at once
async fn get_report(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.report.as_ref().clone()))
}

// ============================================================================
// Router
// ============================================================================

/// Build the `/api` router with permissive CORS
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/summary", get(get_summary))
        .route("/kpis", get(get_kpis))
        .route("/sales/weekly", get(get_weekly_sales))
        .route("/rfm", get(get_rfm))
        .route("/quantiles", get(get_quantiles))
        .route("/profiles", get(get_profiles))
        .route("/profiles/:profile", get(filter_profiles))
        .route("/heatmap", get(get_heatmap))
        .route("/retention", get(get_retention))
        .route("/insights", get(get_insights))
        .route("/quality", get(get_quality))
        .route("/report", get(get_report))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::TransactionLoader;
    use crate::report::build_report;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    const DATA: &str = "customerID,orderDate,orderID,orderValue\n\
                        A,05/01/2024,1,10\n\
                        B,11/01/2024,2,20\n\
                        B,10/01/2024,3,20\n\
                        C,17/01/2024,4,30\n\
                        C,16/01/2024,5,30\n\
                        C,15/01/2024,6,30\n\
                        D,23/01/2024,7,40\n\
                        D,22/01/2024,8,40\n\
                        D,21/01/2024,9,40\n\
                        D,20/01/2024,10,40\n";

    fn app() -> Router {
        let transactions = TransactionLoader::new().load_reader(DATA.as_bytes()).unwrap();
        let report = build_report(&transactions, 3).unwrap();
        router(AppState::new(report))
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], "OK");
    }

    #[tokio::test]
    async fn test_rfm_table() {
        let (status, body) = get_json("/api/rfm").await;
        assert_eq!(status, StatusCode::OK);

        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["customerID"], "A");
        assert_eq!(rows[0]["RFMClass"], "444");
        assert_eq!(rows[0]["profile"], "at_risk");
        assert_eq!(rows[3]["profile"], "champion");
    }

    #[tokio::test]
    async fn test_quantiles() {
        let (_, body) = get_json("/api/quantiles").await;
        assert_eq!(body["data"]["Frequency"]["p25"], 1.75);
        assert_eq!(body["data"]["Frequency"]["p50"], 2.5);
        assert_eq!(body["data"]["Frequency"]["p75"], 3.25);
    }

    #[tokio::test]
    async fn test_profile_filter() {
        let (status, body) = get_json("/api/profiles/champion,at_risk").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let (_, body) = get_json("/api/profiles/all").await;
        assert_eq!(body["data"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_profile() {
        let (status, body) = get_json("/api/profiles/vip").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "unknown profile: vip");
    }

    #[tokio::test]
    async fn test_kpis_and_retention() {
        let (_, body) = get_json("/api/kpis").await;
        assert_eq!(body["data"]["orders"], 10);
        assert_eq!(body["data"]["unique_customers"], 4);

        let (_, body) = get_json("/api/retention").await;
        assert_eq!(body["data"][0]["month"], "2024-01");
    }
}
