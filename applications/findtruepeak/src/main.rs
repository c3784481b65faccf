/// findtruepeak - print the per-channel true peak of audio files
use clap::Parser;
use findtruepeak::{
    config::MeterConfig,
    measure_file,
    output::{render_json, render_text},
    OutputFormat,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "findtruepeak")]
#[command(about = "Measure ITU-R BS.1770 true peak levels of audio files", long_about = None)]
struct Cli {
    /// Audio files to measure
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Decimals printed for dBTP values
    #[arg(short, long)]
    precision: Option<usize>,

    /// Maximum frames pushed into the meter per call
    #[arg(long)]
    chunk_frames: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only results
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "findtruepeak=info,truepeak=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = MeterConfig::load(cli.config.as_deref())?;
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(precision) = cli.precision {
        config.precision = precision;
    }
    if let Some(chunk_frames) = cli.chunk_frames {
        config.chunk_frames = chunk_frames;
    }
    config.validate()?;

    let mut failed = 0_usize;
    for path in &cli.files {
        match measure_file(path, &config) {
            Ok(report) => match config.format {
                OutputFormat::Text => print!("{}", render_text(path, &report, config.precision)),
                OutputFormat::Json => println!("{}", render_json(path, &report)?),
            },
            Err(e) => {
                tracing::error!(path = %path.display(), "Measurement failed: {}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} file(s) could not be measured", failed, cli.files.len());
    }

    Ok(())
}
