// src/cli/mod.rs — CLI definition (clap derive)

pub mod init;
pub mod shell;
pub mod status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pokerpal", about = "Poker night ledger bot for Discord and RocketChat", version)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Watch the configured chat channels and answer poker commands (default)
    Run,
    /// Type commands locally, without a chat platform
    Shell {
        /// Room name for the local session
        #[arg(long, default_value = "local")]
        room: String,
    },
    /// Show configuration and check integration credentials
    Status,
    /// Write a default config file and store credentials
    Init {
        /// Discord bot token to store
        #[arg(long)]
        discord_token: Option<String>,
        /// RocketChat server URL to store
        #[arg(long, requires = "rocketchat_user_id")]
        rocketchat_url: Option<String>,
        /// RocketChat user ID
        #[arg(long, requires = "rocketchat_token")]
        rocketchat_user_id: Option<String>,
        /// RocketChat personal access token
        #[arg(long)]
        rocketchat_token: Option<String>,
    },
}
