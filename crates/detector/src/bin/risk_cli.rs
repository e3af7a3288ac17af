use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use risk_atlas_common::{init_tracing, SystemConfig};
use risk_atlas_detector::{OpenAiEngine, RiskDetector};

#[derive(Parser)]
#[command(name = "risk-cli")]
#[command(about = "Classify use case descriptions against a risk catalog")]
struct Cli {
    /// TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: String,

    /// Ask one Yes/No question per risk instead of one batched question
    #[arg(long)]
    per_risk: bool,

    /// File with one use case per line (stdin when omitted)
    usecases: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("info")?;

    let cli = Cli::parse();
    let config = SystemConfig::load(&cli.config)?;

    let usecases = read_usecases(cli.usecases.as_deref())?;
    if usecases.is_empty() {
        eprintln!("No use cases provided");
        std::process::exit(1);
    }

    let engine = Arc::new(OpenAiEngine::new(&config.inference)?);
    let detector = RiskDetector::from_config(engine, &config)?;

    let results = if cli.per_risk {
        detector.detect_one(&usecases).await?
    } else {
        detector.detect(&usecases).await?
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for (usecase, risks) in usecases.iter().zip(&results) {
        let names: Vec<&str> = risks.iter().map(|r| r.name.as_str()).collect();
        writeln!(handle, "{}\t{}", usecase, serde_json::to_string(&names)?)?;
    }

    Ok(())
}

fn read_usecases(path: Option<&std::path::Path>) -> Result<Vec<String>> {
    let lines: Vec<String> = match path {
        Some(path) => std::fs::read_to_string(path)?
            .lines()
            .map(str::to_string)
            .collect(),
        None => io::stdin()
            .lock()
            .lines()
            .collect::<std::result::Result<_, _>>()?,
    };

    Ok(lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect())
}
