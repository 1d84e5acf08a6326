use std::process::ExitCode;
use std::sync::Arc;

use engine::docker::DockerEngine;

mod api;
mod cli;
mod engine;
mod signals;
mod status;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("Failed to create Docker client: {0}")]
    Engine(#[from] bollard::errors::Error),
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine, everything has a default.
    let _ = dotenv::dotenv();

    // Initialize the logger
    env_logger::init();

    match run(cli::get_cli_args()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &cli::Args) -> Result<(), StartupError> {
    let engine = Arc::new(DockerEngine::connect(args.engine_timeout()).await?);
    let app = api::router(engine.clone());

    let addr = args.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;

    log::info!("Starting Docker status API on {addr}");
    signals::notify_ready();

    axum::serve(listener, app)
        .with_graceful_shutdown(signals::shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    drop(engine);
    log::info!("Docker client released, bye");
    Ok(())
}
