// src/main.rs — PokerPal entry point

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use pokerpal::bot::dispatcher::Dispatcher;
use pokerpal::bot::runner;
use pokerpal::cli::init::InitOptions;
use pokerpal::cli::{Cli, Commands};
use pokerpal::infra::config::Config;
use pokerpal::infra::{logger, paths};
use pokerpal::integrations::credentials::IntegrationCredentials;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(paths::config_file_path);

    // Init must work before any config exists
    if let Some(Commands::Init {
        discord_token,
        rocketchat_url,
        rocketchat_user_id,
        rocketchat_token,
    }) = &cli.command
    {
        let opts = InitOptions {
            discord_token: discord_token.clone(),
            rocketchat_url: rocketchat_url.clone(),
            rocketchat_user_id: rocketchat_user_id.clone(),
            rocketchat_token: rocketchat_token.clone(),
        };
        return pokerpal::cli::init::run_init(&config_path, opts).await;
    }

    // Load config (falls back to defaults if no config.toml)
    let config = if cli.config.is_some() {
        Config::load_from(&config_path)?
    } else {
        Config::load()?
    };

    let log_dir = config.logging.file.then(paths::log_dir);
    if let Some(path) = logger::init_logging(&config.logging.level, log_dir.as_deref())? {
        tracing::debug!("Logging to {}", path.display());
    }

    match cli.command {
        Some(Commands::Status) => pokerpal::cli::status::show_status(&config, &config_path).await,
        Some(Commands::Shell { room }) => {
            let dispatcher = build_dispatcher(&config)?;
            pokerpal::cli::shell::run_shell(dispatcher, &room).await
        }
        Some(Commands::Run) | None => {
            let creds = IntegrationCredentials::load()?;
            let registry = Arc::new(runner::build_registry(&config, &creds));
            let dispatcher = build_dispatcher_with(&config, &creds)?;
            runner::run_bot(&config, registry, dispatcher).await?;
            Ok(())
        }
        Some(Commands::Init { .. }) => Ok(()),
    }
}

fn build_dispatcher(config: &Config) -> anyhow::Result<Dispatcher> {
    let creds = IntegrationCredentials::load()?;
    build_dispatcher_with(config, &creds)
}

fn build_dispatcher_with(config: &Config, creds: &IntegrationCredentials) -> anyhow::Result<Dispatcher> {
    let mirror = runner::build_mirror(config, creds)?;
    Ok(Dispatcher::new(config.bot.command_prefix.clone(), mirror))
}
