use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    CandidateFile, ClassifierClient, ClassifierTransport, HttpClassifier, InMemoryPreviewStore,
    NoopReveal, Phase, SubmitOutcome, DEFAULT_REVEAL_DELAY,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{apply_overrides, load_settings, Settings};

#[derive(Parser, Debug)]
#[command(name = "leafscan", about = "Classify potato leaf images with a remote model")]
struct Args {
    /// Classifier service base URL (overrides classifier.toml and env).
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate an image, submit it and print the result.
    Classify {
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Check that the classifier service is reachable.
    Ping,
    /// Print the guide to the conditions the model recognises.
    Labels,
}

fn resolve_settings(args: &Args) -> Settings {
    let mut settings = load_settings();
    apply_overrides(&mut settings, args.server_url.as_deref(), args.timeout_secs);
    settings
}

async fn read_candidate(path: &Path) -> Result<CandidateFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read image '{}'", path.display()))?;
    let media_type = mime_guess::from_path(path).first_raw().map(str::to_string);
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    debug!(file = %name, media_type = ?media_type, "read candidate image");
    Ok(CandidateFile::new(name, media_type, bytes))
}

async fn classify(settings: &Settings, path: &Path, json: bool) -> Result<ExitCode> {
    let candidate = read_candidate(path).await?;
    let transport = Arc::new(HttpClassifier::with_timeout(
        &settings.server_url,
        settings.request_timeout(),
    )?);
    let client = ClassifierClient::new_with_dependencies(
        transport,
        Arc::new(InMemoryPreviewStore::new()),
        Arc::new(NoopReveal),
        DEFAULT_REVEAL_DELAY,
    );

    if let Err(err) = client.select(candidate).await {
        eprintln!("⚠️ {err}");
        return Ok(ExitCode::from(2));
    }

    info!(server_url = %settings.server_url, "analyzing image");
    let state = match client.submit().await {
        SubmitOutcome::Completed(state) => state,
        SubmitOutcome::Ignored | SubmitOutcome::Superseded => client.snapshot().await,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&render::view(&state))?);
    } else {
        println!("{}", render::render_text(&state));
    }

    client.close().await;
    Ok(if state.phase() == Phase::Succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn ping(settings: &Settings) -> Result<ExitCode> {
    let transport = HttpClassifier::with_timeout(&settings.server_url, settings.request_timeout())?;
    match transport.ping().await {
        Ok(reply) => {
            println!("{}: {reply}", transport.server_url());
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("⚠️ {err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    let settings = resolve_settings(&args);

    match &args.command {
        Command::Classify { path, json } => classify(&settings, path, *json).await,
        Command::Ping => ping(&settings).await,
        Command::Labels => {
            print!("{}", render::render_guide());
            Ok(ExitCode::SUCCESS)
        }
    }
}
