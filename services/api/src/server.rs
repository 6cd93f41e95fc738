use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryResponseRepository};
use crate::routes::with_schedule_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use party_scheduler::config::AppConfig;
use party_scheduler::error::AppError;
use party_scheduler::telemetry;
use party_scheduler::workflows::scheduling::{
    CsvResponseStore, ResponseRepository, SchedulingService,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    match config.schedule.response_dir.clone() {
        Some(dir) => {
            let store = Arc::new(CsvResponseStore::open(&dir)?);
            info!(path = %dir.display(), "storing responses as CSV files");
            serve(config, store).await
        }
        None => {
            info!("storing responses in memory");
            serve(config, Arc::new(InMemoryResponseRepository::default())).await
        }
    }
}

async fn serve<R>(config: AppConfig, repository: Arc<R>) -> Result<(), AppError>
where
    R: ResponseRepository + 'static,
{
    let setup = config.schedule.setup()?;
    info!(
        first = %setup.dates.first(),
        last = %setup.dates.last(),
        deadline = %setup.deadline,
        "party date poll configured"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(SchedulingService::new(
        setup,
        repository,
        config.schedule.role_weights.clone(),
    ));

    let app = with_schedule_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "party scheduler ready");

    axum::serve(listener, app).await?;
    Ok(())
}
