//! presetgen - generate a model preset from a hub repository

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use presetgen::types::config::{GeneratorConfig, HUGGINGFACE_ENDPOINT};
use presetgen::types::preset::PresetDocument;

/// Print the preset of a hub model as YAML
#[derive(Parser, Debug)]
#[command(name = "presetgen", version, about, long_about = None)]
struct Cli {
    /// Hub API token (falls back to $HF_TOKEN)
    #[arg(long, default_value = "")]
    token: String,

    /// Hub endpoint
    #[arg(long, env = "HF_ENDPOINT", default_value = HUGGINGFACE_ENDPOINT)]
    endpoint: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Model repository, e.g. Qwen/Qwen3-8B
    model_repo: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = GeneratorConfig {
        endpoint: cli.endpoint,
        request_timeout_secs: cli.timeout,
        ..GeneratorConfig::default()
    };

    let param = match presetgen::generate_preset_with(&config, &cli.model_repo, &cli.token).await {
        Ok(param) => param,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match serde_yml::to_string(&PresetDocument::from(&param)) {
        Ok(yaml) => {
            println!("{}", yaml);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error marshaling YAML: {}", e);
            ExitCode::FAILURE
        }
    }
}
