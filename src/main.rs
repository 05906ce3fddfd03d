mod config;
mod error;
mod handler;
mod models;
mod mqtt_service;
mod service_utils;

use crate::config::Config;
use crate::handler::ConsoleHandler;
use crate::mqtt_service::Subscriber;
use crate::service_utils::{client_id, shutdown_signal};
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only the subscriber output
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Error loading configuration: {:?}", e);
            return ExitCode::FAILURE;
        }
    };

    let handler = ConsoleHandler::new(std::io::stdout(), config.topic.clone(), config.mqtt_qos);
    let mut subscriber = Subscriber::new(&config, &client_id(&config.mqtt_client_id_prefix), handler);

    let result = subscriber.run_until_shutdown(shutdown_signal()).await;
    match result {
        Ok(()) => {
            info!("Subscriber shut down ({:?}).", subscriber.state());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Subscriber stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}
