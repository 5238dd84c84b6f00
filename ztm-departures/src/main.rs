use std::process::ExitCode;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ztm_departures::board::DepartureBoard;
use ztm_departures::cache::{CacheConfig, CachedDepartureBoard};
use ztm_departures::config::Settings;
use ztm_departures::web::{AppState, create_router};
use ztm_departures::ztm::{MockScheduleSource, ScheduleSource, ZtmClient};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match settings.mock_dir.clone() {
        Some(dir) => match MockScheduleSource::from_dir(&dir) {
            Ok(source) => {
                tracing::warn!(
                    dir = %dir.display(),
                    lines = ?source.available_lines(),
                    "serving canned timetables"
                );
                serve(source, settings).await
            }
            Err(e) => Err(e.to_string()),
        },
        None => match ZtmClient::new(settings.ztm.clone()) {
            Ok(client) => serve(client, settings).await,
            Err(e) => Err(e.to_string()),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("server failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn serve<S: ScheduleSource + 'static>(source: S, settings: Settings) -> Result<(), String> {
    let board = DepartureBoard::new(source, settings.zone);
    let cached = CachedDepartureBoard::new(board, &CacheConfig::default());
    let app = create_router(AppState::new(cached, settings.auth_token.clone()));

    let listener = tokio::net::TcpListener::bind(settings.listen)
        .await
        .map_err(|e| format!("cannot bind {}: {e}", settings.listen))?;

    tracing::info!(
        addr = %settings.listen,
        zone = %settings.zone,
        auth = settings.auth_token.is_some(),
        "ZTM departure board listening"
    );
    tracing::info!("  GET /health                                 - Health check");
    tracing::info!("  GET /schedule/{{stop_id}}/{{stop_number}}?lines=14,16 - Soonest departures");

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("server error: {e}"))
}
