use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

/// Header row of the sample export, in the upstream export's column order.
const SAMPLE_HEADERS: [&str; 21] = [
    "发布时间", "BV号", "AV号", "标题", "作者", "分类", "标签", "aid",
    "点赞数", "投币数", "收藏数", "分享数", "播放量", "弹幕数", "评论数",
    "时长", "简介", "标签数量", "原创性", "动态文案", "子分区",
];

/// Three well-formed sample rows: two originals and one cover.
const SAMPLE_ROWS: [[&str; 21]; 3] = [
    [
        "2024-01-01 08:30:00", "BV1Ab4y1a7Xc", "AV170001",
        "【初音未来】TEST ORIGINAL SONG - 测试原创曲", "测试作者1", "Original",
        "初音未来,VOCALOID,原创曲,测试", "170001", "1234", "567", "890", "123",
        "12345", "234", "345", "3:45", "这是一首测试原创曲", "4", "原创",
        "新曲发布！", "VOCALOID",
    ],
    [
        "2024-01-01 12:45:00", "BV1Cb4y1a7Xd", "AV170002",
        "【洛天依】TEST COVER SONG - 测试翻唱", "测试作者2", "Cover",
        "洛天依,翻唱,cover,测试", "170002", "987", "432", "321", "54",
        "8765", "123", "234", "4:20", "这是一首测试翻唱", "4", "转载",
        "翻唱发布！", "VOCALOID",
    ],
    [
        "2024-01-01 15:20:00", "BV1Db4y1a7Xe", "AV170003",
        "【镜音铃】ANOTHER ORIGINAL SONG - 另一首原创", "测试作者3", "Original",
        "镜音铃,VOCALOID,原创曲", "170003", "2345", "678", "901", "234",
        "23456", "345", "456", "4:15", "另一首测试原创曲", "3", "原创",
        "第二首原创发布！", "VOCALOID",
    ],
];

/// Name the sample file the way real exports are named, date token included.
const SAMPLE_FILENAME: &str = "Bilibili_20240101_ボカロOriginal&Cover.csv";

/// Write the bundled sample CSV (BOM-prefixed UTF-8, like the real exports)
/// into the input directory. Returns the path of the created file.
pub fn write_sample_csv(input_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(input_dir)
        .with_context(|| format!("creating {}", input_dir.display()))?;

    let path = input_dir.join(SAMPLE_FILENAME);
    let mut file = File::create(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    file.write_all("\u{feff}".as_bytes())
        .context("writing BOM")?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(SAMPLE_HEADERS)?;
    for row in SAMPLE_ROWS {
        writer.write_record(row)?;
    }
    writer.flush().context("flushing sample CSV")?;

    info!("sample CSV written: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::convert_csv_file;
    use crate::fields::{AID, AVID, CATEGORY, LIKES};

    #[test]
    fn test_sample_converts_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample_csv(dir.path()).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            SAMPLE_FILENAME
        );

        let records = convert_csv_file(&path);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0][CATEGORY], "Original");
        assert_eq!(records[1][CATEGORY], "Cover");
        assert_eq!(records[2][CATEGORY], "Original");
        assert_eq!(records[0][LIKES], 1234);
        // The "aid" header resolves to AV号 and regains its prefix; the bare
        // numeric id is derived back from it.
        assert_eq!(records[0][AVID], "AV170001");
        assert_eq!(records[0][AID], "170001");
    }
}
