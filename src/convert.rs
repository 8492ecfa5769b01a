use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{error, warn};

use crate::classify::classify;
use crate::fields::{normalize_row, Record, PUBLISH_TIME, TITLE};
use crate::timestamp::parse_datetime;

/// Pick the delimiter from the header line. Comma and semicolon are only
/// chosen when unambiguous; a line containing both falls through to the
/// comma default (long-standing quirk, kept as-is).
pub fn detect_delimiter(first_line: &str) -> u8 {
    let has_comma = first_line.contains(',');
    let has_semicolon = first_line.contains(';');
    if has_comma && !has_semicolon {
        b','
    } else if has_semicolon && !has_comma {
        b';'
    } else if first_line.contains('\t') {
        b'\t'
    } else {
        b','
    }
}

/// Convert one CSV file into an ordered list of records, sorted ascending by
/// publish time. Any failure is logged and degraded to an empty list; a bad
/// file never aborts a batch.
pub fn convert_csv_file(path: &Path) -> Vec<Record> {
    match try_convert(path) {
        Ok(records) => records,
        Err(err) => {
            error!("failed to convert {}: {:#}", path.display(), err);
            Vec::new()
        }
    }
}

fn try_convert(path: &Path) -> Result<Vec<Record>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    let Some(first_line) = content.lines().next() else {
        warn!("empty CSV file: {}", path.display());
        return Ok(Vec::new());
    };
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = reader.headers().context("reading CSV header row")?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.context("reading CSV row")?;
        let record = classify(&normalize_row(headers.iter(), row.iter()));

        match record.get(PUBLISH_TIME).and_then(Value::as_str) {
            Some(ts) if !ts.is_empty() => records.push(record),
            _ => {
                let title = record
                    .get(TITLE)
                    .and_then(Value::as_str)
                    .unwrap_or("未知标题");
                warn!("dropping record without publish time: {}", title);
            }
        }
    }

    records.sort_by_key(|r| {
        parse_datetime(r.get(PUBLISH_TIME).and_then(Value::as_str).unwrap_or(""))
    });

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{COVER, ORIGINAL};
    use crate::fields::CATEGORY;
    use std::io::Write;

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c"), b',');
        assert_eq!(detect_delimiter("a;b;c"), b';');
        assert_eq!(detect_delimiter("a\tb\tc"), b'\t');
        assert_eq!(detect_delimiter("plain"), b',');
        // Ambiguous header falls through to comma.
        assert_eq!(detect_delimiter("a,b;c"), b',');
    }

    fn write_csv(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_convert_sorts_and_classifies() {
        let dir = tempfile::tempdir().unwrap();
        let csv = "\u{feff}发布时间,标题,标签\n\
                   2024-01-01 12:45:00,后发,洛天依翻唱\n\
                   2024-01-01 08:30:00,先发,初音未来原创曲\n";
        let path = write_csv(dir.path(), "Bilibili_20240101_x.csv", csv);

        let records = convert_csv_file(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0][crate::fields::TITLE], "先发");
        assert_eq!(records[0][CATEGORY], ORIGINAL);
        assert_eq!(records[1][crate::fields::TITLE], "后发");
        assert_eq!(records[1][CATEGORY], COVER);
    }

    #[test]
    fn test_missing_publish_time_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let csv = "发布时间,标题\n,无时间\n2024-01-01 08:30:00,有时间\n";
        let path = write_csv(dir.path(), "Bilibili_20240101_x.csv", csv);

        let records = convert_csv_file(&path);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0][crate::fields::TITLE], "有时间");
    }

    #[test]
    fn test_semicolon_delimited() {
        let dir = tempfile::tempdir().unwrap();
        let csv = "发布时间;标题;点赞数\n2024-01-01 08:30:00;测试;42\n";
        let path = write_csv(dir.path(), "Bilibili_20240101_x.csv", csv);

        let records = convert_csv_file(&path);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0][crate::fields::LIKES], 42);
    }

    #[test]
    fn test_unreadable_file_yields_empty() {
        let records = convert_csv_file(Path::new("/no/such/file.csv"));
        assert!(records.is_empty());
    }
}
