//! Lodestar CLI entry point.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use lodestar::commands;
use lodestar::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let (api, namespace) = match lodestar::lobby_api(&config) {
        Ok(setup) => setup,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("lodestar: {e}");
            return ExitCode::from(3);
        }
    };

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        namespace = %namespace,
        "Lodestar starting",
    );

    let outcome = commands::run(&config.command, &api, &namespace, &config.access_token).await;
    println!("{}", outcome.to_json());

    if config.metrics {
        eprint!("{}", api.client().metrics().render());
    }

    outcome.exit_code()
}
