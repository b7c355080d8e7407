use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::info;

use bechdel_core::config::JudgeConfig;
use bechdel_core::BechdelAnalyzer;

mod report;

#[derive(Parser)]
#[command(
    name = "bechdel",
    version,
    about = "Bechdel test analysis for screenplay-formatted scripts"
)]
struct Cli {
    /// Script file to analyze, or `-` to read from stdin
    script: PathBuf,

    /// Emit the analysis result as JSON instead of a report
    #[arg(long)]
    json: bool,

    /// Skip the external judgment service entirely (rule-based heuristics only)
    #[arg(long)]
    no_judge: bool,

    /// Ollama model used for judgment calls
    #[arg(long, env = "OLLAMA_MODEL")]
    model: Option<String>,

    /// Base URL of the Ollama server
    #[arg(long, env = "OLLAMA_HOST")]
    host: Option<String>,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("fatal: {e:?}");
        // Processing errors are not FAIL verdicts; exit distinctly.
        std::process::exit(2);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let script_text = read_script(&cli.script)?;
    let analyzer = build_analyzer(&cli)?;
    let result = analyzer.analyze_script(&script_text).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", report::render(&result));
    }
    Ok(())
}

fn build_analyzer(cli: &Cli) -> anyhow::Result<BechdelAnalyzer> {
    if cli.no_judge {
        info!("judgment service disabled, running rule-based only");
        return Ok(BechdelAnalyzer::offline());
    }

    let mut config = JudgeConfig::from_env()?;
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    info!(model = %config.model, host = %config.host, "judgment service configured");
    Ok(BechdelAnalyzer::from_config(config)?)
}

fn read_script(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading script from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading script file {}", path.display()))
    }
}
