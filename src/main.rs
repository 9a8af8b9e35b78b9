//! qagen HTTP server
//!
//! Starts an Axum web server that turns QA and free-form requests into
//! hosted-model output.

use clap::Parser;
use qagen::{
    cli::{Cli, Command, generate_config_template},
    config::Config,
    handlers::{self, AppState},
    models::GeminiClient,
    telemetry,
};
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::Config { output }) = cli.command {
        let template = generate_config_template();
        match output {
            Some(path) => {
                std::fs::write(&path, template)?;
                println!("Wrote configuration template to {}", path);
            }
            None => print!("{}", template),
        }
        return Ok(());
    }

    // .env is optional
    let _ = dotenvy::dotenv();

    // Missing credential or model name aborts here, before anything binds
    let config = Config::load(cli.config.as_deref().map(Path::new))?;

    telemetry::init(&config.observability.log_level);

    let client = GeminiClient::new(&config.model)?;

    tracing::info!(
        "Starting qagen server on {}:{} (model {})",
        config.server.host,
        config.server.port,
        config.model.name()
    );

    let addr = config.server.socket_addr()?;

    let state = AppState::new(Arc::new(config), Arc::new(client))?;
    let app = handlers::router(state);

    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
