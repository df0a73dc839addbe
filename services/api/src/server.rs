use crate::cli::ServeArgs;
use crate::infra::{AppState, ConfiguredRiskAnalyzer};
use crate::routes::with_visit_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use visitgate::config::AppConfig;
use visitgate::error::AppError;
use visitgate::telemetry;
use visitgate::visits::{seed, ApplicationStore, InMemoryApplicationStore, VisitService};

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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryApplicationStore::default());
    if args.seed {
        let today = Local::now().date_naive();
        for application in seed::initial_applications(today) {
            if let Err(err) = store.create(application) {
                warn!(%err, "sample application could not be seeded");
            }
        }
    }

    let analyzer = Arc::new(ConfiguredRiskAnalyzer::from_config(&config.risk));
    let service = Arc::new(VisitService::new(store, analyzer));

    let app = with_visit_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "visitor pass service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
