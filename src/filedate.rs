use chrono::NaiveDate;
use std::path::Path;

/// Date extracted from an input filename such as
/// `Bilibili_20240101_ボカロOriginal&Cover.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDate {
    /// Raw 8-digit token, used as filename component and sort key.
    pub token: String,
    /// Human-readable `YYYY-MM-DD`.
    pub display: String,
}

/// Scan underscore-delimited segments of the basename for an 8-digit token
/// that is a valid calendar date. Tokens that are 8 digits but not a real
/// date (e.g. `20240199`) are skipped and scanning continues.
pub fn extract_date_from_filename(filename: &str) -> Option<FileDate> {
    let basename = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    for segment in basename.split('_') {
        if segment.len() == 8 && segment.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(date) = NaiveDate::parse_from_str(segment, "%Y%m%d") {
                return Some(FileDate {
                    token: segment.to_string(),
                    display: date.format("%Y-%m-%d").to_string(),
                });
            }
        }
    }
    None
}
