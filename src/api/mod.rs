use axum::{
    Router,
    extract::{Json, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Local;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::core::{Calculator, FundModel};
use crate::error::{CrmError, SubmissionError};
use crate::lead::{HttpCrmClient, LeadGateway, LeadRecord};
use crate::wizard::{EstimateRequest, run_estimate};

const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";
const INVALID_BODY_MESSAGE: &str = "Invalid request body";
const LEAD_CAPTURED_MESSAGE: &str = "Lead captured successfully";
const LEAD_FAILED_MESSAGE: &str =
    "Failed to capture lead. Please try again or contact us directly.";

#[derive(Clone)]
pub struct AppState {
    pub calculator: Arc<Calculator>,
    pub gateway: Arc<LeadGateway>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Self, CrmError> {
        let crm = HttpCrmClient::new(config.crm_config())?;
        Ok(Self {
            calculator: Arc::new(Calculator::default()),
            gateway: Arc::new(LeadGateway::new(
                Arc::new(crm),
                config.crm_location_id.clone(),
            )),
        })
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LeadResponse {
    success: bool,
    message: &'static str,
    #[serde(rename = "ghlContactId", skip_serializing_if = "Option::is_none")]
    contact_id: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/submit-lead", post(submit_lead_handler))
        .route("/api/estimate", post(estimate_handler))
        .route("/api/fund", get(fund_handler))
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_http_server(config: AppConfig) -> std::io::Result<()> {
    if config.crm_api_key.is_none() {
        tracing::warn!("CRM_API_KEY is not set; lead submissions will fail");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = router(AppState::from_config(&config).map_err(std::io::Error::other)?);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "OZ calculator API listening");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn fund_handler(State(state): State<AppState>) -> Response {
    let fund: &FundModel = &state.calculator.fund;
    json_response(StatusCode::OK, fund)
}

async fn submit_lead_handler(
    State(state): State<AppState>,
    payload: Result<Json<LeadRecord>, JsonRejection>,
) -> Response {
    let lead = match payload {
        Ok(Json(lead)) => lead,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected lead body");
            return lead_response(StatusCode::BAD_REQUEST, INVALID_BODY_MESSAGE, None);
        }
    };

    match state.gateway.submit(&lead).await {
        Ok(contact_id) => lead_response(StatusCode::OK, LEAD_CAPTURED_MESSAGE, Some(contact_id)),
        Err(SubmissionError::Validation(_)) => {
            lead_response(StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE, None)
        }
        Err(SubmissionError::Crm(_)) => {
            lead_response(StatusCode::INTERNAL_SERVER_ERROR, LEAD_FAILED_MESSAGE, None)
        }
    }
}

async fn estimate_handler(
    State(state): State<AppState>,
    payload: Result<Json<EstimateRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    };

    let today = Local::now().date_naive();
    match run_estimate(Arc::clone(&state.calculator), request, today) {
        Ok(estimate) => json_response(StatusCode::OK, estimate),
        Err(e) => error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    }
}

fn lead_response(status: StatusCode, message: &'static str, contact_id: Option<String>) -> Response {
    json_response(
        status,
        LeadResponse {
            success: status.is_success(),
            message,
            contact_id,
        },
    )
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
