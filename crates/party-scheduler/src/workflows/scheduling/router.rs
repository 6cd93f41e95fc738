use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::announcement::Announcement;
use super::ingestion::RawSubmission;
use super::repository::{RepositoryError, ResponseRepository};
use super::scoring::{DateScore, ScoreResult};
use super::service::{SchedulingService, SchedulingServiceError};

/// Router builder exposing the poll, response intake, and scoring endpoints.
pub fn schedule_router<R>(service: Arc<SchedulingService<R>>) -> Router
where
    R: ResponseRepository + 'static,
{
    Router::new()
        .route("/api/v1/schedule", get(overview_handler::<R>))
        .route("/api/v1/schedule/responses", post(submit_handler::<R>))
        .route("/api/v1/schedule/score", post(score_handler::<R>))
        .with_state(service)
}

/// Body of a scoring request. `force` scores before the deadline. An empty
/// body means deadline mode as of today.
#[derive(Debug, Default, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Scoring result as exposed over HTTP.
#[derive(Debug, Serialize)]
pub struct ScoreView {
    pub best_date: NaiveDate,
    pub best_score: u64,
    pub response_count: usize,
    pub ranking: Vec<DateScore>,
    pub announcement: Announcement,
}

impl From<ScoreResult> for ScoreView {
    fn from(result: ScoreResult) -> Self {
        Self {
            best_date: result.best_date,
            best_score: result.best_score,
            response_count: result.response_count,
            ranking: result.ranking(),
            announcement: Announcement::for_result(&result),
        }
    }
}

pub(crate) async fn overview_handler<R>(
    State(service): State<Arc<SchedulingService<R>>>,
) -> Response
where
    R: ResponseRepository + 'static,
{
    let today = Local::now().date_naive();
    match off_runtime(service, move |service| service.overview(today)).await {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &other),
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<SchedulingService<R>>>,
    Json(submission): Json<RawSubmission>,
) -> Response
where
    R: ResponseRepository + 'static,
{
    match off_runtime(service, move |service| service.submit(submission)).await {
        Ok(receipt) => (StatusCode::ACCEPTED, Json(receipt)).into_response(),
        Err(error @ SchedulingServiceError::Ingestion(_)) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, &error)
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &other),
    }
}

pub(crate) async fn score_handler<R>(
    State(service): State<Arc<SchedulingService<R>>>,
    body: Bytes,
) -> Response
where
    R: ResponseRepository + 'static,
{
    let request = match parse_score_request(&body) {
        Ok(request) => request,
        Err(error) => {
            let status = match error.classify() {
                serde_json::error::Category::Data => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::BAD_REQUEST,
            };
            let payload = json!({
                "error": format!("invalid score request: {error}"),
            });
            return (status, Json(payload)).into_response();
        }
    };
    let outcome = if request.force {
        off_runtime(service, |service| service.score()).await
    } else {
        let today = request.today.unwrap_or_else(|| Local::now().date_naive());
        off_runtime(service, move |service| service.finalize(today)).await
    };

    match outcome {
        Ok(result) => (StatusCode::OK, Json(ScoreView::from(result))).into_response(),
        Err(error @ SchedulingServiceError::DeadlinePending { .. }) => {
            error_response(StatusCode::CONFLICT, &error)
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &other),
    }
}

/// Run a service call on the blocking pool; repositories may do file I/O.
async fn off_runtime<R, T, F>(
    service: Arc<SchedulingService<R>>,
    work: F,
) -> Result<T, SchedulingServiceError>
where
    R: ResponseRepository + 'static,
    T: Send + 'static,
    F: FnOnce(&SchedulingService<R>) -> Result<T, SchedulingServiceError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || work(&service))
        .await
        .map_err(|err| {
            RepositoryError::Unavailable(format!("storage task did not complete: {err}"))
        })?
}

fn parse_score_request(body: &[u8]) -> Result<ScoreRequest, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ScoreRequest::default());
    }
    serde_json::from_slice(body)
}

fn error_response(status: StatusCode, error: &SchedulingServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}
