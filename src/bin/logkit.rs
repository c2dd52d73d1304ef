use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use logkit::config::{load_config, spawn_reloader, ConfigWatcher};
use logkit::{layer, new_logger, Field, Level};

#[derive(Parser)]
#[command(name = "logkit")]
#[command(about = "Structured JSON logging to stdout and a rotating file", long_about = None)]
struct Cli {
    /// Path to the TOML logger configuration
    #[arg(short, long, default_value = "logkit.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the parsed configuration
    Check,
    /// Write a single record
    Emit {
        #[arg(short, long, default_value = "info")]
        level: Level,

        #[arg(short, long)]
        name: Option<String>,

        message: Vec<String>,
    },
    /// Emit heartbeat records while hot-reloading the configuration
    Watch {
        #[arg(long, default_value_t = 5)]
        interval_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Check => {
            let mut resolved = serde_json::to_value(&config)?;
            resolved["resolvedPath"] = config.log_path().display().to_string().into();
            println!("{}", serde_json::to_string_pretty(&resolved)?);
        }
        Commands::Emit {
            level,
            name,
            message,
        } => {
            let logger = new_logger(&config)?;
            let logger = match name {
                Some(name) => logger.named(&name),
                None => logger,
            };
            logger.log(level, &message.join(" "), &[]);
            logger.sync()?;
        }
        Commands::Watch { interval_secs } => {
            let logger = new_logger(&config)?;
            layer::install(logger.clone())?;

            let (watcher, updates) = ConfigWatcher::new(&cli.config);
            let _watcher = watcher.run()?;
            let reloader = spawn_reloader(logger.clone(), updates);

            let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
            let mut beat: u64 = 0;
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    _ = ticker.tick() => {
                        beat += 1;
                        tracing::debug!(beat, "heartbeat (debug)");
                        tracing::info!(beat, threshold = %logger.level().level(), "heartbeat");
                    }
                }
            }

            reloader.abort();
            logger.info("Shutdown complete", &[Field::u64("beats", beat)]);
            logger.sync()?;
        }
    }

    Ok(())
}
