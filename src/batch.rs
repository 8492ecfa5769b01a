use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::classify::{COVER, ORIGINAL};
use crate::convert::convert_csv_file;
use crate::fields::{Record, CATEGORY};
use crate::filedate::extract_date_from_filename;

/// Filename prefix of the ranking exports.
pub const EXPORT_PREFIX: &str = "Bilibili";

/// Aggregate index filename.
pub const INDEX_FILENAME: &str = "dates.json";

/// Explicit batch configuration; nothing is derived from the executable path.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// Per-date summary stored in the index under the display date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateEntry {
    pub date: String,
    pub display_date: String,
    pub filename: String,
    pub path: String,
    pub total_videos: usize,
    pub original_count: usize,
    pub cover_count: usize,
    pub other_count: usize,
    pub sort_key: String,
}

/// Aggregate of all date entries, rebuilt from scratch on every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateIndex {
    pub last_updated: String,
    pub total_videos: usize,
    pub total_original: usize,
    pub total_cover: usize,
    pub total_days: usize,
    /// Keyed by display date, ordered descending by sort key.
    pub dates: Map<String, Value>,
}

fn count_category(videos: &[Record], category: &str) -> usize {
    videos
        .iter()
        .filter(|v| v.get(CATEGORY).and_then(Value::as_str) == Some(category))
        .count()
}

/// Write a JSON document pretty-printed (2-space indent, non-ASCII kept raw).
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Discover candidate exports: prefix-matched files plus any other CSV.
/// The two patterns overlap, so the union is deduplicated before processing.
fn discover_csv_files(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in [format!("{EXPORT_PREFIX}_*.csv"), "*.csv".to_string()] {
        let full = input_dir.join(&pattern);
        let full = full.to_str().context("input directory is not valid UTF-8")?;
        for entry in glob::glob(full).context("invalid glob pattern")? {
            match entry {
                Ok(path) => files.push(path),
                Err(err) => warn!("unreadable directory entry: {err}"),
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Process every CSV in the input directory: one `videos_<date>.json` per
/// extractable file date, plus the aggregate `dates.json`. Per-file failures
/// degrade to zero records; only directory creation can abort the batch.
pub fn process_all(options: &BatchOptions) -> Result<DateIndex> {
    fs::create_dir_all(&options.input_dir)
        .with_context(|| format!("creating {}", options.input_dir.display()))?;
    fs::create_dir_all(&options.output_dir)
        .with_context(|| format!("creating {}", options.output_dir.display()))?;

    // Site-relative prefix for index entries, e.g. "data/videos_20240101.json".
    let site_prefix = options
        .output_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("data")
        .to_string();

    let files = discover_csv_files(&options.input_dir)?;
    let mut index = DateIndex {
        last_updated: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        total_videos: 0,
        total_original: 0,
        total_cover: 0,
        total_days: 0,
        dates: Map::new(),
    };

    if files.is_empty() {
        warn!(
            "no CSV files found, place exports in {}",
            options.input_dir.display()
        );
        return Ok(index);
    }
    info!("found {} CSV file(s)", files.len());

    let mut entries: HashMap<String, DateEntry> = HashMap::new();

    for file in &files {
        let basename = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        info!("processing {basename}");

        let Some(file_date) = extract_date_from_filename(basename) else {
            warn!("skipping {basename}: no date in filename");
            continue;
        };

        let videos = convert_csv_file(file);
        if videos.is_empty() {
            warn!("skipping {basename}: no records parsed");
            continue;
        }

        let original_count = count_category(&videos, ORIGINAL);
        let cover_count = count_category(&videos, COVER);
        let other_count = videos.len() - original_count - cover_count;

        let json_filename = format!("videos_{}.json", file_date.token);
        write_json(&options.output_dir.join(&json_filename), &videos)?;

        info!(
            "converted {} video(s): {} Original, {} Cover, {} Other",
            videos.len(),
            original_count,
            cover_count,
            other_count
        );

        entries.insert(
            file_date.display.clone(),
            DateEntry {
                date: file_date.token.clone(),
                display_date: file_date.display,
                path: format!("{site_prefix}/{json_filename}"),
                filename: json_filename,
                total_videos: videos.len(),
                original_count,
                cover_count,
                other_count,
                sort_key: file_date.token,
            },
        );
    }

    let mut sorted: Vec<DateEntry> = entries.into_values().collect();
    sorted.sort_by(|a, b| b.sort_key.cmp(&a.sort_key));

    for entry in &sorted {
        index.total_videos += entry.total_videos;
        index.total_original += entry.original_count;
        index.total_cover += entry.cover_count;
    }
    index.total_days = sorted.len();
    for entry in sorted {
        let key = entry.display_date.clone();
        index.dates.insert(key, serde_json::to_value(entry)?);
    }

    write_json(&options.output_dir.join(INDEX_FILENAME), &index)?;
    info!(
        "index written: {} day(s), {} video(s), {} Original, {} Cover",
        index.total_days, index.total_videos, index.total_original, index.total_cover
    );

    Ok(index)
}
