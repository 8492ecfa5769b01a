use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bilicsv::batch::{self, BatchOptions};
use bilicsv::convert::convert_csv_file;
use bilicsv::fixture;

#[derive(Parser)]
#[command(
    name = "bilicsv",
    version,
    about = "Convert Bilibili video CSV exports into per-date JSON plus a date index"
)]
struct Cli {
    /// Write the bundled sample CSV into the input directory and exit
    #[arg(long)]
    fixture: bool,

    /// Convert a single CSV file and write <output-dir>/output.json
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Directory scanned for CSV exports
    #[arg(long, default_value = "csv_data")]
    input_dir: PathBuf,

    /// Directory receiving the JSON output
    #[arg(long, default_value = "data")]
    output_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if cli.fixture {
        let path = fixture::write_sample_csv(&cli.input_dir)?;
        info!("run `bilicsv` to process {}", path.display());
        return Ok(());
    }

    if let Some(csv_path) = cli.csv {
        anyhow::ensure!(csv_path.exists(), "file not found: {}", csv_path.display());
        let videos = convert_csv_file(&csv_path);
        info!("parsed {} video(s)", videos.len());

        std::fs::create_dir_all(&cli.output_dir)?;
        let out = cli.output_dir.join("output.json");
        batch::write_json(&out, &videos)?;
        info!("JSON written: {}", out.display());
        return Ok(());
    }

    let options = BatchOptions {
        input_dir: cli.input_dir,
        output_dir: cli.output_dir,
    };
    batch::process_all(&options)?;
    Ok(())
}
