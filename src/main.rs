use anyhow::{anyhow, Context};
use config::{Config, File};
use log::info;
use tokio::signal;
use tokio::sync::broadcast;
use mapout::map::map_adapter::MapAdapter;
use mapout::map::map_command::MapCommand;
use mapout::rest::http_server::spawn_http_server;
use mapout::rest::rest_paths::CONSOLE_DIR;
use mapout::service::workout_service::WorkoutService;
use mapout::state::shared_state::SharedState;

const CONFIG_YAML: &str = "conf/application.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::builder()
        .add_source(File::with_name(CONFIG_YAML).required(false))
        .build()?;

    let host = config.get_string("server.host").unwrap_or("localhost".to_string());
    let port = config.get_int("server.port").unwrap_or(3000) as u16;
    let db_path = config.get_string("database.path").unwrap_or("mapout.db".to_string());

    let service = WorkoutService::new(&db_path)
        .with_context(|| format!("Cannot open database {db_path}"))?;

    let (tx_map, _) = broadcast::channel::<MapCommand>(16);
    let (tx_term, rx_term) = broadcast::channel(1);

    let map = MapAdapter::new(tx_map);
    let state = SharedState::new(service, map, tx_term.clone())
        .map_err(|e| anyhow!("Failed to restore workouts: {e}"))?;

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    info!("Console on http://{}:{}{}", host, port, CONSOLE_DIR.rest_path);
    let http_server = spawn_http_server(listener, state, rx_term, &CONSOLE_DIR);

    await_shutdown().await;
    info!("Termination signal received");
    tx_term.send(())?;

    let _ = http_server.await;
    info!("HTTP Server terminated");

    Ok(())
}

// See https://github.com/tokio-rs/axum/blob/main/examples/graceful-shutdown/src/main.rs
async fn await_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
