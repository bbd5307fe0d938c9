//! Portal Push CLI - tooling for the job portal's push notifications.
//!
//! This is the main binary entry point. See the `portal_push` library for
//! the enrollment flow and the background notification handler.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use portal_push::commands::{self, register::RawSubscription};
use portal_push::{Config, UserIdentity};

#[derive(Parser)]
#[command(name = "portal-push")]
#[command(version)]
#[command(about = "Web push enrollment tooling for the job portal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration
    Config,
    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Validate a VAPID public key (defaults to the configured one)
    CheckKey {
        /// base64url VAPID public key
        #[arg(long)]
        key: Option<String>,
    },
    /// Register an existing browser subscription with the device registry
    Register {
        /// Backend user id
        #[arg(long)]
        user_id: String,
        /// Display name
        #[arg(long)]
        name: String,
        /// Account email
        #[arg(long)]
        email: String,
        /// Push endpoint URL
        #[arg(long)]
        endpoint: String,
        /// base64url P-256 ECDH public key
        #[arg(long)]
        p256dh: String,
        /// base64url auth secret
        #[arg(long)]
        auth: String,
    },
    /// Show the notification a push payload would produce
    PreviewPush {
        /// Raw push body (usually JSON)
        payload: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::InitConfig { force } => {
            let path = Config::config_path()?;
            if path.exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
            }
            Config::default().save_to(&path)?;
            println!("Wrote {}", path.display());
        }
        Commands::CheckKey { key } => {
            let key = key.unwrap_or_else(|| config.vapid_public_key.clone());
            commands::key::check(&key)?;
        }
        Commands::Register {
            user_id,
            name,
            email,
            endpoint,
            p256dh,
            auth,
        } => {
            let identity = UserIdentity::new(user_id, name, email);
            let subscription = RawSubscription {
                endpoint,
                p256dh,
                auth,
            };
            commands::register::run(&config.api_root, &identity, &subscription)
                .await
                .context("Device registration failed")?;
        }
        Commands::PreviewPush { payload } => {
            commands::preview::run(payload.as_deref()).await?;
        }
    }

    Ok(())
}
