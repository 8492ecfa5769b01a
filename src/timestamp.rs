use chrono::NaiveDateTime;

/// Accepted publish-time formats, tried in order. Covers `-` and `/` date
/// separators, with and without seconds, plus the CJK 年/月/日 spellings.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%Y年%m月%d日 %H:%M:%S",
    "%Y年%m月%d日 %H:%M",
];

/// Parse a publish-time string into a sortable epoch-seconds key.
/// Interpreted as naive wall time; returns 0 if nothing matches. The result
/// is only ever used for ordering, so failure is silent.
pub fn parse_datetime(value: &str) -> i64 {
    if value.is_empty() {
        return 0;
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return dt.and_utc().timestamp();
        }
    }
    0
}
