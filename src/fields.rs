use serde_json::{Map, Value};

/// Canonical schema keys. These are the keys the consuming site reads, so
/// they stay in the export's original language.
pub const PUBLISH_TIME: &str = "发布时间";
pub const BVID: &str = "BV号";
pub const AVID: &str = "AV号";
pub const AID: &str = "aid";
pub const TITLE: &str = "标题";
pub const AUTHOR: &str = "作者";
pub const CATEGORY: &str = "分类";
pub const TAGS: &str = "标签";
pub const LIKES: &str = "点赞数";
pub const COINS: &str = "投币数";
pub const FAVORITES: &str = "收藏数";
pub const SHARES: &str = "分享数";
pub const VIEWS: &str = "播放量";
pub const DANMAKUS: &str = "弹幕数";
pub const REPLIES: &str = "评论数";
pub const DURATION: &str = "时长";
pub const DESCRIPTION: &str = "简介";
pub const TAG_COUNT: &str = "标签数量";
pub const COPYRIGHT: &str = "原创性";
pub const DYNAMIC: &str = "动态文案";
pub const SUBZONE: &str = "子分区";

/// A normalized row: canonical field name -> string or integer value.
/// Insertion order is preserved through serialization.
pub type Record = Map<String, Value>;

/// Accepted header spellings per canonical field, in resolution order.
/// The first canonical field whose alias list contains the cleaned header
/// wins, scanning in table order.
static FIELD_ALIASES: &[(&str, &[&str])] = &[
    (PUBLISH_TIME, &["发布时间", "投稿时间", "pubdate", "Publish Time"]),
    (BVID, &["BV号", "BV", "bvid", "BV ID"]),
    (AVID, &["AV号", "AV", "av号", "aid", "AV ID"]),
    (AID, &["aid", "AID"]),
    (TITLE, &["标题", "视频标题", "title", "Title"]),
    (AUTHOR, &["作者", "UP主", "投稿人", "author", "Author"]),
    (CATEGORY, &["分类", "类型", "category", "Category"]),
    (TAGS, &["标签", "tag", "tags", "Tags"]),
    (LIKES, &["点赞数", "点赞", "like", "Like", "likes"]),
    (COINS, &["投币数", "硬币", "coin", "Coin", "coins"]),
    (FAVORITES, &["收藏数", "收藏", "favorite", "Favorite", "favorites"]),
    (SHARES, &["分享数", "分享", "share", "Share", "shares"]),
    (VIEWS, &["播放量", "播放", "view", "View", "views"]),
    (DANMAKUS, &["弹幕数", "弹幕", "danmaku", "Danmaku", "danmakus"]),
    (REPLIES, &["评论数", "评论", "reply", "Reply", "replies"]),
    (DURATION, &["时长", "视频时长", "duration", "Duration"]),
    (DESCRIPTION, &["简介", "描述", "description", "Description"]),
    (TAG_COUNT, &["标签数量", "标签数", "tag_count", "Tag Count"]),
    (COPYRIGHT, &["原创性", "版权", "copyright", "Copyright"]),
    (DYNAMIC, &["动态文案", "动态", "dynamic", "Dynamic"]),
    (SUBZONE, &["子分区", "分区", "subzone", "Subzone"]),
];

/// Counter fields coerced to integers.
const COUNTER_FIELDS: &[&str] = &[
    LIKES, COINS, FAVORITES, SHARES, VIEWS, DANMAKUS, REPLIES, TAG_COUNT,
];

/// Resolve a cleaned header to its canonical field name, if any.
pub fn canonical_field(header: &str) -> Option<&'static str> {
    FIELD_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.contains(&header))
        .map(|(canonical, _)| *canonical)
}

pub fn is_counter_field(field: &str) -> bool {
    COUNTER_FIELDS.contains(&field)
}

/// Parse a counter value. Exports sometimes carry decimal counters, so the
/// value is parsed as f64 and truncated. Empty or garbage input yields 0.
pub fn parse_counter(value: &str) -> i64 {
    if value.is_empty() {
        return 0;
    }
    match value.parse::<f64>() {
        Ok(n) => (n.trunc() as i64).max(0),
        Err(_) => 0,
    }
}

/// Strip surrounding whitespace and any byte-order marks from a header cell.
fn clean_header(raw: &str) -> String {
    raw.trim().replace('\u{feff}', "")
}

/// Normalize one raw row into a record, pairing each header with its cell.
/// Recognized headers map to canonical fields; counters are coerced;
/// everything else passes through under its cleaned header.
pub fn normalize_row<'a, H, R>(headers: H, row: R) -> Record
where
    H: IntoIterator<Item = &'a str>,
    R: IntoIterator<Item = &'a str>,
{
    let mut record = Record::new();
    for (raw_header, raw_value) in headers.into_iter().zip(row.into_iter()) {
        let header = clean_header(raw_header);
        let value = raw_value.trim();

        match canonical_field(&header) {
            Some(field) if is_counter_field(field) => {
                record.insert(field.to_string(), Value::from(parse_counter(value)));
            }
            Some(field) => {
                record.insert(field.to_string(), Value::from(value));
            }
            None => {
                record.insert(header, Value::from(value));
            }
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_resolution() {
        assert_eq!(canonical_field("发布时间"), Some(PUBLISH_TIME));
        assert_eq!(canonical_field("pubdate"), Some(PUBLISH_TIME));
        assert_eq!(canonical_field("UP主"), Some(AUTHOR));
        assert_eq!(canonical_field("views"), Some(VIEWS));
        assert_eq!(canonical_field("something else"), None);
    }

    #[test]
    fn test_ambiguous_alias_resolves_in_table_order() {
        // "aid" is listed under both AV号 and aid; AV号 comes first.
        assert_eq!(canonical_field("aid"), Some(AVID));
        assert_eq!(canonical_field("AID"), Some(AID));
    }

    #[test]
    fn test_parse_counter() {
        assert_eq!(parse_counter("1234"), 1234);
        assert_eq!(parse_counter("12.7"), 12);
        assert_eq!(parse_counter(""), 0);
        assert_eq!(parse_counter("n/a"), 0);
        assert_eq!(parse_counter("-5"), 0);
    }

    #[test]
    fn test_normalize_row() {
        let headers = ["\u{feff}发布时间", " 标题 ", "like", "自定义列"];
        let row = ["2024-01-01 08:30:00", " 测试 ", "12.9", "x"];
        let record = normalize_row(headers, row);

        assert_eq!(record[PUBLISH_TIME], "2024-01-01 08:30:00");
        assert_eq!(record[TITLE], "测试");
        assert_eq!(record[LIKES], 12);
        assert_eq!(record["自定义列"], "x");
    }

    #[test]
    fn test_short_row_keeps_leading_columns() {
        let headers = ["标题", "点赞数"];
        let row = ["only title"];
        let record = normalize_row(headers, row);

        assert_eq!(record[TITLE], "only title");
        assert!(!record.contains_key(LIKES));
    }
}
