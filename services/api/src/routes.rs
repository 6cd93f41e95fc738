use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use party_scheduler::workflows::scheduling::{
    schedule_router, ResponseRepository, SchedulingService,
};

pub(crate) fn with_schedule_routes<R>(service: Arc<SchedulingService<R>>) -> axum::Router
where
    R: ResponseRepository + 'static,
{
    schedule_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryResponseRepository;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use party_scheduler::workflows::scheduling::{RoleWeights, ScheduleSetup};
    use tower::ServiceExt;

    fn service() -> Arc<SchedulingService<InMemoryResponseRepository>> {
        let start = NaiveDate::from_ymd_opt(2025, 10, 1).expect("valid start date");
        let end = NaiveDate::from_ymd_opt(2025, 10, 3).expect("valid end date");
        let setup = ScheduleSetup::new(start, end, end, "").expect("setup");
        Arc::new(SchedulingService::new(
            setup,
            Arc::new(InMemoryResponseRepository::default()),
            RoleWeights::standard(),
        ))
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn schedule_routes_are_mounted_next_to_health() {
        let router = with_schedule_routes(service());

        let response = router
            .clone()
            .oneshot(
                Request::get("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(
                Request::get("/api/v1/schedule")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
