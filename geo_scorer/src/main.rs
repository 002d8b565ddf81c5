use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use geo_scorer::{utils, Config, GeoPipeline};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Score a web page for Generative Engine Optimization", long_about = None)]
struct Args {
    /// URL of the page to analyze
    #[arg(short, long)]
    url: String,

    /// Also write the analysis JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print a plain-text summary instead of JSON
    #[arg(short, long)]
    summary: bool,

    /// Model identifier sent to the AI gateway
    #[arg(long)]
    model: Option<String>,

    /// Maximum extracted text length (in characters)
    #[arg(short, long)]
    max_content_length: Option<usize>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", json!({ "error": e.to_string() }));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::from_env()?;
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(max) = args.max_content_length {
        config.max_content_chars = max;
    }

    let pipeline = GeoPipeline::from_config(&config)?;
    let analysis = pipeline.analyze(&args.url).await?;

    if let Some(path) = &args.output {
        utils::save_json(&analysis, path)?;
    }

    if args.summary {
        print!("{}", utils::render_summary(&args.url, &analysis));
    } else {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    }
    Ok(())
}
