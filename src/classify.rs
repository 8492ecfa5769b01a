use serde_json::Value;

use crate::fields::{Record, AID, AVID, CATEGORY, COPYRIGHT, TAGS};

/// Canonical category values emitted into the 分类 field.
pub const ORIGINAL: &str = "Original";
pub const COVER: &str = "Cover";
pub const OTHER: &str = "Other";

/// Explicit 分类 markers. The canonical English values are accepted so that
/// already-normalized exports survive a second pass unchanged.
const ORIGINAL_CATEGORY_MARKERS: &[&str] = &["原创", ORIGINAL];
const COVER_CATEGORY_MARKERS: &[&str] = &["翻唱", COVER];

/// Tag tokens that mark an original work / a cover. The Latin "cover" token
/// is matched case-insensitively; the CJK tokens are matched verbatim.
const ORIGINAL_TAG_TOKENS: &[&str] = &["原创", "原创曲", "オリジナル"];
const COVER_TAG_TOKENS: &[&str] = &["翻唱", "カバー"];

/// Truthy spellings of the 原创性 flag.
const COPYRIGHT_ORIGINAL_VALUES: &[&str] = &["原创", "1", "原创作品"];
const COPYRIGHT_ORIGINAL: &str = "原创";
const COPYRIGHT_REPRINT: &str = "转载";

const AV_PREFIX: &str = "AV";

fn str_field<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}

/// Derive the category. An explicit 分类 field takes precedence over the
/// tag text; anything unrecognized falls back to Other.
fn derive_category(record: &Record) -> &'static str {
    if let Some(category) = str_field(record, CATEGORY) {
        let category = category.trim();
        if ORIGINAL_CATEGORY_MARKERS.contains(&category) {
            return ORIGINAL;
        }
        if COVER_CATEGORY_MARKERS.contains(&category) {
            return COVER;
        }
        return OTHER;
    }

    let tags = str_field(record, TAGS).unwrap_or("");
    if ORIGINAL_TAG_TOKENS.iter().any(|t| tags.contains(t)) {
        return ORIGINAL;
    }
    if COVER_TAG_TOKENS.iter().any(|t| tags.contains(t))
        || tags.to_lowercase().contains("cover")
    {
        return COVER;
    }
    OTHER
}

/// Classify a normalized record: fix the category, collapse the originality
/// flag to 原创/转载, and normalize the AV号/aid identifier pair.
/// Pure; returns an augmented copy of the input record.
pub fn classify(record: &Record) -> Record {
    let mut out = record.clone();

    out.insert(CATEGORY.to_string(), Value::from(derive_category(record)));

    if let Some(copyright) = str_field(record, COPYRIGHT) {
        let collapsed = if COPYRIGHT_ORIGINAL_VALUES.contains(&copyright) {
            COPYRIGHT_ORIGINAL
        } else {
            COPYRIGHT_REPRINT
        };
        out.insert(COPYRIGHT.to_string(), Value::from(collapsed));
    }

    let avid = str_field(record, AVID).map(|v| {
        if !v.is_empty() && !v.starts_with(AV_PREFIX) {
            format!("{AV_PREFIX}{v}")
        } else {
            v.to_string()
        }
    });
    if let Some(avid) = &avid {
        out.insert(AVID.to_string(), Value::from(avid.clone()));
    }

    let aid_missing = str_field(record, AID).map_or(true, str::is_empty);
    if aid_missing {
        if let Some(numeric) = avid.as_deref().and_then(|v| v.strip_prefix(AV_PREFIX)) {
            out.insert(AID.to_string(), Value::from(numeric));
        }
    }

    out
}
