//! quran-etl command line entry point

use clap::Parser;
use quran_etl::{CommentaryMode, Config, HttpQuranSource, Pipeline, Stage};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "quran-etl")]
#[command(about = "Fetch Quran text, metadata and tafseer into a static JSON dataset")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory (overrides the configuration file)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Tafseer scheduling (overrides the configuration file)
    #[arg(long, value_enum)]
    commentary: Option<CommentaryMode>,

    /// Stage to run
    #[arg(long, value_enum, default_value_t = Stage::All)]
    stage: Stage,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

async fn run(cli: Cli) -> quran_etl::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(mode) = cli.commentary {
        config.commentary.mode = mode;
    }

    tracing::info!(
        data_dir = %config.data_dir.display(),
        stage = ?cli.stage,
        "starting data fetch"
    );

    let source = HttpQuranSource::new(&config.upstream)?;
    let pipeline = Pipeline::new(config, Arc::new(source))?;
    pipeline.run(cli.stage).await
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, code = e.error_code(), "main execution failed");
            ExitCode::FAILURE
        }
    }
}
