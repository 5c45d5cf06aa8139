mod commands;
mod gateway;
mod provider_builder;

use clap::{Parser, Subcommand};
use gateway::{Gateway, Pipeline, PipelineSettings};
use provider_builder::{build_detector, build_translator};
use std::collections::HashMap;
use std::sync::Arc;
use tolk_channels::StdioChannel;
use tolk_core::{
    config::{self, shellexpand, Config},
    message::Decision,
    traits::Channel,
};
use tolk_providers::TranslateShell;
use tolk_store::{Registry, Store};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "tolk",
    version,
    about = "tolk: posts English translations of foreign-language chat messages"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot on every enabled channel.
    Start,
    /// Check backend availability and stored state.
    Status,
    /// Run one text through the content gates and the translator.
    Translate {
        /// The text to translate.
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let bootstrap_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let cfg = load_config(&cli.config, bootstrap_filter, std::io::stderr)?;

    let with_file = matches!(cli.command, Commands::Start);
    let _guard = init_logging(&cfg, with_file)?;

    match cli.command {
        Commands::Start => {
            let translator = build_translator(&cfg)?;
            if !translator.is_available().await {
                anyhow::bail!("translator '{}' is not available", translator.name());
            }
            let detector = build_detector(&cfg)?;

            // Build channels.
            let mut channels: HashMap<String, Arc<dyn Channel>> = HashMap::new();

            if let Some(ref stdio) = cfg.channel.stdio {
                if stdio.enabled {
                    let channel = StdioChannel::new(stdio.clone());
                    channels.insert("stdio".to_string(), Arc::new(channel));
                }
            }

            if channels.is_empty() {
                anyhow::bail!("No channels enabled. Enable at least one channel in config.toml.");
            }

            let store = Store::new(&cfg.store).await?;
            let registry = Arc::new(Registry::load(store, cfg.pipeline.channel_slots).await?);

            let pipeline = Pipeline::new(
                registry,
                translator,
                detector,
                PipelineSettings::from_config(&cfg),
            );
            let gw = Arc::new(Gateway::new(channels, pipeline));
            gw.run().await?;
        }
        Commands::Status => {
            println!("tolk status\n");
            println!("Config: {}", cli.config);
            println!("Translator: {}", cfg.translator.backend);
            println!(
                "Detector: {}",
                if cfg.detector.enabled {
                    cfg.detector.backend.as_str()
                } else {
                    "disabled"
                }
            );
            println!();

            let trans = TranslateShell::check_cli(&cfg.translator.translate_shell.path).await;
            println!(
                "  translate-shell ({}): {}",
                cfg.translator.translate_shell.path,
                if trans { "available" } else { "not found" }
            );
            println!(
                "  google: {}",
                if cfg.translator.google.api_key.is_empty() {
                    "no api key"
                } else {
                    "configured"
                }
            );
            println!();

            let store = Store::new(&cfg.store).await?;
            let registry = Registry::load(store, cfg.pipeline.channel_slots).await?;
            let snapshot = registry.snapshot();
            println!("Database: {}", shellexpand(&cfg.store.db_path));
            println!("  enrolled channels: {}", snapshot.enrolled_count());
            println!("  banned words: {}", snapshot.banned_words().len());
        }
        Commands::Translate { text } => {
            if text.is_empty() {
                anyhow::bail!("no text provided. Usage: tolk translate <text>");
            }
            let text = text.join(" ");

            let translator = build_translator(&cfg)?;
            if !translator.is_available().await {
                anyhow::bail!("translator '{}' is not available", translator.name());
            }
            let detector = build_detector(&cfg)?;
            let store = Store::new(&cfg.store).await?;
            let registry = Arc::new(Registry::load(store, cfg.pipeline.channel_slots).await?);

            let pipeline = Pipeline::new(
                registry.clone(),
                translator,
                detector,
                PipelineSettings::from_config(&cfg),
            );
            let result = pipeline
                .evaluate_content(&text, &registry.snapshot())
                .await?;
            match result.decision {
                Decision::Emitted(out) => println!("{out}"),
                Decision::Suppressed(reason) => {
                    println!("suppressed: {reason}");
                    if let Some(translated) = result.translated {
                        println!("translation: {translated}");
                    }
                }
            }
        }
    }

    Ok(())
}

/// Load the config under a temporary stderr subscriber, so messages logged
/// before `init_logging` (such as the missing-file fallback) are not lost.
fn load_config<W>(path: &str, filter: EnvFilter, writer: W) -> anyhow::Result<Config>
where
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .finish();
    let cfg = tracing::subscriber::with_default(bootstrap, || config::load(path))?;
    Ok(cfg)
}

/// Install the tracing subscriber.
///
/// Logs go to stderr (stdout may carry the stdio channel). With `with_file`,
/// a daily-rolling copy is written to `{data_dir}/logs/tolk.log`; the
/// returned guard must be held until exit.
fn init_logging(cfg: &Config, with_file: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.tolk.log_level));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    if !with_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    }

    let log_dir = format!("{}/logs", shellexpand(&cfg.tolk.data_dir));
    std::fs::create_dir_all(&log_dir)?;
    let appender = tracing_appender::rolling::daily(&log_dir, "tolk.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    Ok(Some(guard))
}
