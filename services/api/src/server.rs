use crate::cli::ServeArgs;
use crate::infra::{
    load_directory, AppState, InMemoryApplicationRepository, InMemoryDocumentStore,
    InMemoryNotifier, PlainTextLetterRenderer,
};
use crate::routes::with_workflow_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hba_workflow::config::AppConfig;
use hba_workflow::error::AppError;
use hba_workflow::telemetry;
use hba_workflow::workflows::hba::applications::HbaApplicationService;
use std::sync::atomic::Ordering;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let directory = Arc::new(load_directory(&config.directory)?);
    let repository = Arc::new(InMemoryApplicationRepository::default());
    let notifier = Arc::new(InMemoryNotifier::default());
    let application_service = Arc::new(HbaApplicationService::new(
        repository,
        notifier,
        Arc::new(InMemoryDocumentStore),
        Arc::new(PlainTextLetterRenderer),
    ));

    let app = with_workflow_routes(application_service)
        .layer(Extension(app_state))
        .layer(Extension(directory.clone()))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        directory_entries = directory.len(),
        "house building advance workflow service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
