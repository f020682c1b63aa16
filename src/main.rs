mod config;
mod constants;
mod error;
mod images;
mod server;
mod utils;
mod vision;

use crate::config::{Config, DeploymentMode};
use colored::Colorize;
use std::{error::Error, net::SocketAddr};
use tokio::net::TcpListener;

fn print_banner(config: &Config, addr: &SocketAddr) {
    println!("{:━^60}", " image-relay ".yellow());
    println!(
        "Listening on {}",
        format!("http://localhost:{}", addr.port()).bold().green()
    );
    println!(
        "Generation profile: {} ({}, {}, {})",
        config.profile.name.bold().cyan(),
        config.profile.model,
        config.profile.quality,
        config.profile.size
    );
    println!("\nRoutes:");
    println!("  {}  /                  healthcheck", "GET ".bold().blue());
    println!(
        "  {}  /generation-image  combine two images from a prompt",
        "POST".bold().magenta()
    );
    println!(
        "  {}  /read-image        extract part numbers from an image",
        "POST".bold().magenta()
    );
    println!("{:━^60}", "".yellow());
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("failed to listen for ctrl-c: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => log::error!("failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    log::info!(
        "starting in {} mode with profile '{}'",
        config.mode.as_str(),
        config.profile.name
    );

    let client = reqwest::Client::builder().build()?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    if config.mode == DeploymentMode::Local {
        print_banner(&config, &addr);
    } else {
        log::info!("listening on {}", addr);
    }

    let app = server::build_router(server::AppState::new(config, client));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
