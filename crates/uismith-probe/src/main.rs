//! Ad hoc probe for the generation relay
//!
//! Sends one description straight to the configured backend and prints the
//! reply. Useful for exercising prompts and generated output without the
//! web front-end; not part of the runtime request path.

use clap::Parser;
use eyre::{eyre, Context, Result};

use generation::{Framework, GenerationConfig, GenerationRequest, Generator};

#[derive(Debug, Parser)]
#[command(name = "uismith-probe", version, about = "Send one UI description to the relay")]
struct Cli {
    /// Description of the component; read from stdin when omitted
    description: Option<String>,

    /// Target framework: svelte, react, vue, html
    #[arg(short, long, default_value = "svelte")]
    framework: String,

    /// Backend name override (openai, ollama)
    #[arg(short, long)]
    backend: Option<String>,

    /// Model override
    #[arg(short, long)]
    model: Option<String>,

    /// Base URL override
    #[arg(long)]
    base_url: Option<String>,

    /// Print only the extracted code block; fail if there is none
    #[arg(long)]
    code_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let framework: Framework = cli.framework.parse().map_err(|e: String| eyre!(e))?;

    let mut config = GenerationConfig::from_env();
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(model) = cli.model {
        config.model = Some(model);
    }
    if let Some(base_url) = cli.base_url {
        config.base_url = Some(base_url);
    }

    let description = match cli.description {
        Some(description) => description,
        None => std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?,
    };

    let generator = Generator::from_config(config).context("Failed to initialize backend")?;
    let request = GenerationRequest::new(description, framework);
    let generation = generator
        .generate(&request)
        .await
        .context("Generation failed")?;

    log::info!(
        "Served by {} ({}, {} chars)",
        generation.backend,
        generation.model,
        generation.raw.len()
    );

    if cli.code_only {
        match generation.code {
            Some(code) => println!("{}", code),
            None => return Err(eyre!("Reply contained no fenced code block")),
        }
    } else {
        println!("{}", generation.raw);
    }

    Ok(())
}
