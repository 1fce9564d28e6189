//! データセット追記
//!
//! CSVは追記専用。ヘッダーはファイル作成時に1度だけ書く。
//! 行は整形済みの文字列を1回のwriteで書き切るため、読み手
//! （グラフ側）が書きかけの行を観測することはない。

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::ScrapeError;
use crate::occupancy::OccupancyRecord;

/// CSVヘッダー（列順はグラフ側との契約。変更しないこと）
pub const CSV_HEADER: &str = "timestamp,pool_count,pool_capacity,gym_count,gym_capacity\n";

/// 追記の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appended {
    /// 1行書き込んだ
    Written,
    /// 直前の行と同一タイムスタンプのため何もしなかった
    Duplicate,
}

/// 重複ガード（分精度タイムスタンプの一致判定）
///
/// 実行が万一重なっても、同じ分のレコードは1行しか残らない。
pub fn should_append(last_ts: Option<&str>, new_ts: &str) -> bool {
    last_ts != Some(new_ts)
}

pub struct CsvDataset {
    path: PathBuf,
}

impl CsvDataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// レコードを追記する
    ///
    /// 直前の行と同じタイムスタンプならno-op（エラーではない）。
    pub fn append(&self, record: &OccupancyRecord) -> Result<Appended, ScrapeError> {
        let new_ts = record.timestamp_minute();
        let last_ts = self.last_timestamp()?;

        if !should_append(last_ts.as_deref(), &new_ts) {
            info!("同一タイムスタンプのためスキップ: {}", new_ts);
            return Ok(Appended::Duplicate);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let header_needed = !self.path.exists();

        // ヘッダーが必要な場合も含め、1回のwriteで書き切る
        let mut buf = String::new();
        if header_needed {
            buf.push_str(CSV_HEADER);
        }
        buf.push_str(&record.csv_line());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(buf.as_bytes())?;

        debug!("1行追記: {:?}", self.path);
        Ok(Appended::Written)
    }

    /// 最終行のタイムスタンプ（1列目）を読む
    fn last_timestamp(&self) -> Result<Option<String>, ScrapeError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let last_line = content.lines().rev().find(|l| !l.trim().is_empty());

        Ok(last_line
            .filter(|l| !l.starts_with("timestamp"))
            .and_then(|l| l.split(',').next())
            .map(|ts| ts.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occupancy::{CategoryReading, FacilitySnapshot};
    use chrono::{offset::FixedOffset, DateTime, TimeZone};

    fn record(h: u32, mi: u32) -> OccupancyRecord {
        let ts: DateTime<FixedOffset> = FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 1, h, mi, 0)
            .unwrap();
        OccupancyRecord::new(
            ts,
            FacilitySnapshot {
                pool: CategoryReading::new(42, 120),
                gym: CategoryReading::new(15, 60),
            },
        )
    }

    #[test]
    fn test_should_append_pure() {
        assert!(should_append(None, "2024-05-01 10:05"));
        assert!(should_append(Some("2024-05-01 10:00"), "2024-05-01 10:05"));
        assert!(!should_append(Some("2024-05-01 10:05"), "2024-05-01 10:05"));
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = CsvDataset::new(dir.path().join("out.csv"));

        dataset.append(&record(10, 0)).unwrap();
        dataset.append(&record(10, 5)).unwrap();

        let content = fs::read_to_string(dir.path().join("out.csv")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(format!("{}\n", lines[0]), CSV_HEADER);
        assert_eq!(lines[1], "2024-05-01 10:00,42,120,15,60");
        assert_eq!(lines[2], "2024-05-01 10:05,42,120,15,60");
    }

    #[test]
    fn test_duplicate_timestamp_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let dataset = CsvDataset::new(&path);

        assert_eq!(dataset.append(&record(10, 5)).unwrap(), Appended::Written);
        let before = fs::read(&path).unwrap();

        assert_eq!(dataset.append(&record(10, 5)).unwrap(), Appended::Duplicate);
        let after = fs::read(&path).unwrap();

        // バイト単位で不変
        assert_eq!(before, after);
    }

    #[test]
    fn test_timestamps_non_decreasing_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        for (h, mi) in [(9, 0), (9, 5), (9, 10), (9, 10), (9, 15)] {
            CsvDataset::new(&path).append(&record(h, mi)).unwrap();
        }

        let content = fs::read_to_string(&path).unwrap();
        let timestamps: Vec<&str> = content
            .lines()
            .skip(1)
            .filter_map(|l| l.split(',').next())
            .collect();
        assert_eq!(timestamps.len(), 4);
        let mut sorted = timestamps.clone();
        sorted.sort();
        assert_eq!(timestamps, sorted);
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("out.csv");
        CsvDataset::new(&path).append(&record(10, 0)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_storage_is_persist_error() {
        let dir = tempfile::tempdir().unwrap();
        // ディレクトリをCSVパスとして渡すとopenに失敗する
        let dataset = CsvDataset::new(dir.path());
        let err = dataset.append(&record(10, 0)).unwrap_err();
        assert!(matches!(err, ScrapeError::Persist(_)));
    }
}
