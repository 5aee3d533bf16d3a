use crate::cli::ServeArgs;
use crate::infra::{
    default_game_service, load_badge_catalog, AppState, InMemoryProgressionRepository,
};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use persuasion_game::config::AppConfig;
use persuasion_game::error::AppError;
use persuasion_game::progression::{ProgressionService, SystemClock};
use persuasion_game::telemetry;
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
    if let Some(path) = args.badge_rules.take() {
        config.badge_rules = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let badges = load_badge_catalog(config.badge_rules.as_deref())?;
    info!(rules = badges.rules().len(), "badge catalog loaded");

    let game_service = Arc::new(default_game_service(config.engine));
    let progression_service = Arc::new(ProgressionService::with_badges(
        Arc::new(InMemoryProgressionRepository::default()),
        badges,
    )
    .with_clock(Arc::new(SystemClock)));

    let app = with_service_routes(game_service, progression_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(environment = config.environment.label(), %addr, "persuasion game engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}
