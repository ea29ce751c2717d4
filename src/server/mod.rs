//! HTTP JSON surface over the feature orchestrators.
//!
//! `GET /api/features` lists the catalogue and `POST /api/execute/:id` runs
//! one feature. Every response carries permissive CORS headers so browser
//! front ends on other origins can call the API.

use std::future::Future;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use http::{HeaderValue, StatusCode};
use serde::{Deserialize, Serialize};

use crate::ai::CompletionService;
use crate::error::InsightError;
use crate::features::{
    Feature, FeatureContext, FeatureDescriptor, FeatureReport, FeatureTarget, catalogue,
    run_feature,
};
use crate::github::{RepositoryGateway, RepositorySlug};
use crate::notifications::NotificationLog;

/// Services shared by every request.
pub struct AppState {
    /// GitHub access.
    pub gateway: Arc<dyn RepositoryGateway>,
    /// Model access.
    pub completion: Arc<dyn CompletionService>,
    /// Notification store for the activity feature.
    pub notifications: NotificationLog,
    /// Whether a model API key is configured.
    pub model_available: bool,
}

#[derive(Debug, Serialize)]
struct FeatureList {
    features: Vec<FeatureDescriptor>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExecuteRequest {
    repo: String,
    branch: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExecuteResponse {
    result: FeatureReport,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, error: &InsightError) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

/// Builds the API router.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/features",
            get(|| async { features() }).options(|| async { StatusCode::NO_CONTENT }),
        )
        .route(
            "/api/execute/:id",
            post(execute).options(|| async { StatusCode::NO_CONTENT }),
        )
        .layer(axum::middleware::map_response(|response: Response| async move {
            with_cors(response)
        }))
        .with_state(state)
}

fn with_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type, authorization"),
    );
    response
}

fn features() -> Json<FeatureList> {
    Json(FeatureList {
        features: catalogue(),
    })
}

/// Validates the request before any upstream call is made.
fn parse_execution(id: &str, body: &[u8]) -> Result<(Feature, FeatureTarget), InsightError> {
    let request: ExecuteRequest =
        serde_json::from_slice(body).map_err(|error| InsightError::InvalidRequest {
            message: error.to_string(),
        })?;
    let repository = RepositorySlug::parse(request.repo.trim())?;
    let feature = id
        .parse::<u8>()
        .ok()
        .and_then(Feature::from_id)
        .ok_or_else(|| InsightError::InvalidFeature {
            input: id.to_owned(),
        })?;
    Ok((
        feature,
        FeatureTarget::new(repository).with_branch(request.branch),
    ))
}

async fn execute(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    let (feature, target) = match parse_execution(&id, &body) {
        Ok(parsed) => parsed,
        Err(error) => {
            tracing::debug!("rejected execute request for feature '{id}': {error}");
            return error_response(StatusCode::BAD_REQUEST, &error);
        }
    };

    if feature.uses_model() && !state.model_available {
        let error = InsightError::Configuration {
            message: "no AI API key configured; set REPOPULSE_AI_API_KEY or GROQ_API_KEY"
                .to_owned(),
        };
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, &error);
    }

    let context = FeatureContext {
        gateway: state.gateway.as_ref(),
        completion: state.completion.as_ref(),
        notifications: &state.notifications,
    };
    match run_feature(feature, context, &target).await {
        Ok(result) => Json(ExecuteResponse { result }).into_response(),
        Err(error) => {
            tracing::error!("{} failed for {}: {error}", feature.name(), target.repository);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &error)
        }
    }
}

/// Serves the API on `bind` until `shutdown` resolves.
///
/// # Errors
///
/// Returns [`InsightError::Server`] when the address cannot be bound or the
/// server fails.
pub async fn serve<F>(bind: &str, state: Arc<AppState>, shutdown: F) -> Result<(), InsightError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let to_error = |error: std::io::Error| InsightError::Server {
        message: format!("{bind}: {error}"),
    };
    let listener = tokio::net::TcpListener::bind(bind).await.map_err(to_error)?;
    let local = listener.local_addr().map_err(to_error)?;
    tracing::info!("serving API on http://{local}/api");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(to_error)
}
