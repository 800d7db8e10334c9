use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};

use qiyaas_core::{DailyTracker, WordValidator, today_key};
use qiyaas_persistence::{connection::connect_and_migrate, repositories::PlayedDayRepository};
use qiyaas_server::{config::Config, create_routes, puzzle_schedule::PuzzleSchedule};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Qiyaas puzzle server...");

    let config = match Config::new() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    info!("Loading words from: {}", config.word_list_path);
    let validator = match WordValidator::from_file(&config.word_list_path) {
        Ok(validator) => Arc::new(validator),
        Err(e) => {
            tracing::error!("{:#}", e);
            tracing::error!("Set WORD_LIST_PATH to a newline separated word list.");
            std::process::exit(1);
        }
    };
    info!("Loaded {} dictionary words", validator.len());

    // Clients fall back to the empty puzzle when nothing is scheduled
    let schedule = match PuzzleSchedule::load(&config.schedule_path) {
        Ok(schedule) => Arc::new(schedule),
        Err(e) => {
            warn!("{}; serving an empty schedule", e);
            Arc::new(PuzzleSchedule::default())
        }
    };

    let db = match connect_and_migrate().await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };
    let tracker = Arc::new(DailyTracker::new(PlayedDayRepository::new(db)));

    let routes = create_routes(schedule.clone(), validator, tracker);

    let watch_schedule = schedule.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60 * 60));
        loop {
            interval.tick().await;
            let today = today_key();
            if watch_schedule.get(&today).is_none() {
                warn!("No puzzle scheduled for today ({})", today);
            }
        }
    });

    let ip = match config.host.parse::<std::net::IpAddr>() {
        Ok(ip) => ip,
        Err(e) => {
            tracing::error!("Invalid HOST {:?}: {}", config.host, e);
            std::process::exit(1);
        }
    };

    info!("Server starting on {}:{}", config.host, config.port);

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown((ip, config.port), async {
        // Wait for SIGINT (Ctrl+C) or SIGTERM
        #[cfg(unix)]
        {
            let mut sigint = match signal::unix::signal(signal::unix::SignalKind::interrupt()) {
                Ok(sigint) => sigint,
                Err(e) => {
                    tracing::error!("Failed to listen for SIGINT: {}", e);
                    return std::future::pending::<()>().await;
                }
            };
            let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(e) => {
                    tracing::error!("Failed to listen for SIGTERM: {}", e);
                    return std::future::pending::<()>().await;
                }
            };

            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully...");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("Failed to listen for ctrl+c: {}", e);
                return std::future::pending::<()>().await;
            }
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    });

    info!("Server started on {}. Press Ctrl+C to stop.", addr);
    server.await;
    info!("Server shutdown complete.");
}
