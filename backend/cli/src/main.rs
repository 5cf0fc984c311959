mod config;
mod doctor_cmd;
mod terminal_output;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use teloxide::Bot;
use tracing::{info, warn};

use ocrbot_channels::{ChannelAdapter, TelegramAdapter, TelegramFetcher};
use ocrbot_commands::{build_default_dispatcher, CommandRegistry};
use ocrbot_config::{load_resolved, log_report, validate, OcrBotConfig};
use ocrbot_core::Recognizer;
use ocrbot_intake::{IntakePool, PhotoIntake};
use ocrbot_logging::init_logger;
use ocrbot_media::ArchiveWriter;
use ocrbot_understanding::TesseractRecognizer;

use terminal_output::{note_success, note_warn};

#[derive(Parser)]
#[command(name = "ocrbot")]
#[command(about = "Telegram bot that reads text from photos with Tesseract")]
#[command(version)]
struct Cli {
    /// Config file (default: $OCRBOT_CONFIG_DIR/config.yaml or ~/.ocrbot/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot (the default when no subcommand is given)
    Run,
    /// Recognize text in a local image and print it
    Recognize {
        /// Image file to read
        image: PathBuf,
    },
    /// Check the config, the Tesseract installation and the archive directory
    Check,
    /// Print the effective config with secrets masked
    Config,
    /// Write a config file with every default filled in
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(config::default_config_path);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Init { force } => {
            config::init(&config_path, force).await?;
            note_success(&format!("Wrote {}", config_path.display()));
            note_warn("Set telegram.botToken there or export TELEGRAM_BOT_TOKEN before running.");
        }
        Commands::Config => {
            let cfg = load_resolved(&config_path).await?;
            print!("{}", config::render_redacted(&cfg)?);
        }
        Commands::Check => {
            let cfg = load_resolved(&config_path).await?;
            if !doctor_cmd::run(&cfg, &config_path).await {
                std::process::exit(1);
            }
        }
        Commands::Recognize { image } => {
            let cfg = load_resolved(&config_path).await?;
            init_logger("warn", None)?;
            recognize_file(&cfg, &image).await?;
        }
        Commands::Run => {
            let cfg = load_resolved(&config_path).await?;
            let log_dir = cfg.log_dir();
            init_logger(cfg.log_level(), log_dir.as_deref())?;
            run_bot(cfg, &config_path).await?;
        }
    }

    Ok(())
}

async fn recognize_file(cfg: &OcrBotConfig, image: &Path) -> Result<()> {
    let recognizer = TesseractRecognizer::new(config::tesseract_config(cfg));
    let text = recognizer
        .recognize(image)
        .await
        .with_context(|| format!("Failed to recognize {}", image.display()))?;
    if text.is_empty() {
        note_warn("No text found.");
    } else {
        println!("{text}");
    }
    Ok(())
}

async fn run_bot(cfg: OcrBotConfig, config_path: &Path) -> Result<()> {
    let report = validate(&cfg);
    log_report(&report);
    if !report.is_valid() {
        bail!(
            "{} has {} error(s); run `ocrbot check` for details",
            config_path.display(),
            report.errors.len()
        );
    }
    let token = cfg
        .bot_token()
        .context("Telegram bot token is not configured")?;

    info!(
        config = %config_path.display(),
        archive = %cfg.archive_dir().display(),
        max_concurrent_photos = cfg.max_concurrent_photos(),
        "Starting ocrbot"
    );

    let recognizer = Arc::new(TesseractRecognizer::new(config::tesseract_config(&cfg)));
    match recognizer.missing_languages().await {
        Ok(missing) if !missing.is_empty() => {
            warn!(missing = ?missing, "Tesseract language packs are not installed")
        }
        Ok(_) => {}
        Err(e) => warn!(error = %format!("{e:#}"), "Could not query Tesseract; recognition will fail"),
    }

    let archive = Arc::new(ArchiveWriter::new(cfg.archive_dir()));
    archive.ensure_dir().await?;

    let bot = Bot::new(token);
    let fetcher = Arc::new(TelegramFetcher::new(bot.clone()));
    let intake = Arc::new(PhotoIntake::new(fetcher, recognizer, archive));
    let pool = Arc::new(IntakePool::new(intake, cfg.max_concurrent_photos()));
    info!(max_concurrent = pool.max_concurrent(), "Intake pool ready");

    let adapter = TelegramAdapter::new(
        bot,
        pool,
        Arc::new(build_default_dispatcher()),
        Arc::new(CommandRegistry::new()),
    );
    info!(adapter = adapter.name(), "All components started");
    adapter.start().await
}
