//! Peg Billiards Server - headless authoritative match runner
//!
//! Loads configuration from the environment, builds the field, and plays an
//! AI-vs-AI match, logging every resolved shot.

use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use peg_billiards::app::AppState;
use peg_billiards::config::Config;
use peg_billiards::net::ServerMsg;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level, config.log_json);

    info!("Starting Peg Billiards Server");
    info!(
        seed = config.match_seed,
        layout = ?config.field_layout,
        left = ?config.left_tier,
        right = ?config.right_tier,
        "Match configuration"
    );

    // Create application state
    let state = AppState::new(config)?;
    info!(pegs = state.field.pegs.len(), "Field ready");

    let (game, handle) = state.create_ai_match();

    // Log the broadcast stream the way a remote peer would see it
    let events = handle.subscribe();
    let reporter = tokio::spawn(report_events(events));

    let summary = tokio::select! {
        summary = game.run() => summary,
        _ = shutdown_signal() => {
            info!("Match interrupted");
            return Ok(());
        }
    };

    drop(handle);
    if let Err(e) = reporter.await {
        warn!(error = %e, "Event reporter failed");
    }

    info!(summary = %serde_json::to_string(&summary)?, "Match summary");
    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str, json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

async fn report_events(mut events: broadcast::Receiver<ServerMsg>) {
    loop {
        match events.recv().await {
            Ok(ServerMsg::ShotResolved {
                turn,
                shooter,
                angle,
                power,
                result,
            }) => {
                info!(
                    turn,
                    ?shooter,
                    angle_deg = angle.to_degrees(),
                    power,
                    frames = result.frame_count,
                    pegs_hit = result.peg_collision_count(),
                    goal = ?result.goal,
                    "Shot resolved"
                );
            }
            Ok(ServerMsg::ScoreUpdate { score }) => {
                info!(left = score.left, right = score.right, "Score");
            }
            Ok(ServerMsg::MatchEnd { .. }) => break,
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(lagged = n, "Event reporter lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}
