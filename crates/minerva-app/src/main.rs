mod cli;
mod commands;

use minerva_api::{ConverseMode, SubmitOptions};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = cli::parse();

    // Load config before logging so the configured level applies
    let mut config = minerva_config::load_config().unwrap_or_else(|e| {
        eprintln!("config load failed, using defaults: {e}");
        minerva_config::MinervaConfig::default()
    });
    if let Some(server) = args.server.clone() {
        config.server.base_url = server;
    }

    let log_directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "minerva=info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("minerva v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = minerva_platform::paths::ensure_dirs() {
        tracing::warn!("failed to create directories: {e}");
    }

    let code = match args.command {
        cli::Command::Login { username } => commands::login(&config, &username).await,
        cli::Command::Logout => commands::logout(&config),
        cli::Command::Whoami => commands::whoami(&config),
        cli::Command::Chat { project } => {
            commands::converse(&config, &project, ConverseMode::Chat, SubmitOptions::default())
                .await
        }
        cli::Command::Question {
            project,
            system,
            k,
            score,
        } => {
            let options = SubmitOptions { k, score, system };
            commands::converse(&config, &project, ConverseMode::Question, options).await
        }
    };

    std::process::exit(code);
}
