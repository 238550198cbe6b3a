// KTP reader: command line and HTTP entry points

use anyhow::Context;
use clap::{Parser, Subcommand};
use ktp_reader::{config::RecognizerConfig, server, ExtractResponse, KtpReader, ReaderConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "ktp-reader", version, about = "Read identity fields from a photo of a KTP")]
struct Cli {
    /// Tesseract language model
    #[arg(long, global = true, default_value = ktp_reader::config::DEFAULT_LANGUAGE)]
    lang: String,

    /// Directory containing the traineddata files
    #[arg(long, global = true)]
    tessdata: Option<PathBuf>,

    /// Log every pipeline stage
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract fields from an image file and print the result as JSON
    Extract {
        image: PathBuf,

        /// Save the binarized image here for inspection
        #[arg(long)]
        snapshot: Option<PathBuf>,

        #[arg(long)]
        pretty: bool,
    },
    /// Serve POST /extract over HTTP
    Serve {
        #[arg(long, default_value = "0.0.0.0:8000")]
        addr: SocketAddr,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = ReaderConfig {
        recognizer: RecognizerConfig {
            language: cli.lang,
            tessdata: cli.tessdata,
            ..RecognizerConfig::default()
        },
        ..ReaderConfig::default()
    };

    match cli.command {
        Command::Extract {
            image,
            snapshot,
            pretty,
        } => {
            config.snapshot = snapshot;
            let reader = KtpReader::new(config);

            log::info!("Reading KTP image at {:?}", image);
            let result = reader.read_file(&image);
            if let Err(err) = &result {
                log::error!("Failed to read {:?}: {}", image, err);
            }
            let response = ExtractResponse::from(result);
            let json = if pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{}", json);

            Ok(if response.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Serve { addr } => {
            let reader = Arc::new(KtpReader::new(config));
            let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
            runtime
                .block_on(server::serve(addr, reader))
                .with_context(|| format!("server on {} failed", addr))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
