use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use gambino_admin::anonymizer::{Anonymizer, DemoMode};
use gambino_admin::api::start_server;
use gambino_admin::auth::check_token;
use gambino_admin::client::BackendClient;
use gambino_admin::data_classifier::SensitiveDataType;
use gambino_admin::settings::{Settings, DEFAULT_CONFIG_PATH};
use gambino_admin::utils::logger::init_logger;
use gambino_admin::watcher::watch_hubs;

#[derive(Parser)]
#[command(name = "gambino-admin", version, about = "Gambino fleet admin dashboard service")]
struct Cli {
    /// Settings file stem, e.g. config/dashboard for config/dashboard.toml
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the dashboard API server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Poll the hub list and log hubs that are offline or silent
    WatchHubs {
        /// Operator session token
        #[arg(long, env = "GAMBINO_TOKEN", hide_env_values = true)]
        token: String,

        /// Seconds between polls
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Print the demo substitute for a value
    Anonymize {
        #[arg(short, long, value_enum, default_value_t = ValueKind::Auto)]
        kind: ValueKind,

        value: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ValueKind {
    Auto,
    Email,
    Phone,
    Wallet,
    HubName,
    MachineName,
    MachineId,
}

/// Logging is best effort: a bad log dir is reported and the command still runs
fn start_logging(log_dir: &str) {
    if let Err(e) = init_logger(log_dir) {
        eprintln!("Failed to initialize logging in {}: {:#}", log_dir, e);
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load(&cli.config)?;

    match cli.command {
        Command::Serve { host, port } => {
            start_logging(&settings.log_dir);
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            start_server(settings.server, settings.backend).await?;
        }
        Command::WatchHubs { token, interval } => {
            start_logging(&settings.log_dir);
            let claims = check_token(&token).context("Refusing to watch with this token")?;
            info!("Watching hubs as {:?}", claims.subject);
            if let Some(interval) = interval {
                settings.watcher.interval_secs = interval;
            }
            let client = BackendClient::new(&settings.backend)?;
            watch_hubs(client, token, settings.watcher).await?;
        }
        Command::Anonymize { kind, value } => {
            let anonymizer = Anonymizer::new(DemoMode::Active);
            let substitute = match kind {
                ValueKind::Auto => anonymizer.anonymize_value(&value, None),
                ValueKind::Email => anonymizer.anonymize_value(&value, Some(SensitiveDataType::Email)),
                ValueKind::Phone => anonymizer.anonymize_value(&value, Some(SensitiveDataType::Phone)),
                ValueKind::Wallet => {
                    anonymizer.anonymize_value(&value, Some(SensitiveDataType::WalletAddress))
                }
                ValueKind::HubName => anonymizer.anonymize_hub_name(&value, &value),
                ValueKind::MachineName => anonymizer.anonymize_machine_name(&value, &value),
                ValueKind::MachineId => anonymizer.anonymize_machine_id(&value),
            };
            println!("{}", substitute);
        }
    }

    Ok(())
}
