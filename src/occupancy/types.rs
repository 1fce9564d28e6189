//! 混雑状況関連の型定義

use std::fmt;

use chrono::{offset::FixedOffset, DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// 台北時間 (UTC+8、サマータイムなし)
pub fn taipei_now() -> DateTime<FixedOffset> {
    let tz = FixedOffset::east_opt(8 * 3600).unwrap();
    Utc::now().with_timezone(&tz)
}

/// 対象カテゴリ（游泳池・健身房の2種のみ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Pool,
    Gym,
}

impl Category {
    /// 両カテゴリ（抽出は常にこの順で行う）
    pub const ALL: [Category; 2] = [Category::Pool, Category::Gym];

    /// ページ上で試すラベル文字列（先頭から順に検索）
    ///
    /// サイトは言語切替によって英語表記になることがあるため、
    /// 中国語ラベルの後に英語ラベルも試す。
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            Category::Pool => &["游泳池", "Swimming pool"],
            Category::Gym => &["健身房", "Fitness", "Gym"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Pool => write!(f, "游泳池"),
            Category::Gym => write!(f, "健身房"),
        }
    }
}

/// 1カテゴリ分の読み取り値（現在人数・容留上限）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryReading {
    pub current: u32,
    pub capacity: u32,
}

impl CategoryReading {
    pub fn new(current: u32, capacity: u32) -> Self {
        Self { current, capacity }
    }
}

/// 1回の取得で得た両カテゴリの読み取り値
///
/// 4つの数値が全て揃った場合のみ生成される（部分的な結果は保持しない）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacilitySnapshot {
    pub pool: CategoryReading,
    pub gym: CategoryReading,
}

/// データセットに永続化される1行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyRecord {
    /// 取得時刻（分精度、台北時間）
    pub timestamp: DateTime<FixedOffset>,
    pub pool_count: u32,
    pub pool_capacity: u32,
    pub gym_count: u32,
    pub gym_capacity: u32,
}

impl OccupancyRecord {
    /// 実行開始時刻とスナップショットからレコードを組み立てる
    ///
    /// 秒以下は切り捨て。current > capacity のような異常値も
    /// そのまま通す（ソース側の一時的な不整合を弾かない）。
    pub fn new(now: DateTime<FixedOffset>, snapshot: FacilitySnapshot) -> Self {
        let timestamp = now
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(now);
        Self {
            timestamp,
            pool_count: snapshot.pool.current,
            pool_capacity: snapshot.pool.capacity,
            gym_count: snapshot.gym.current,
            gym_capacity: snapshot.gym.capacity,
        }
    }

    /// CSVの1列目に入る分精度のタイムスタンプ文字列
    pub fn timestamp_minute(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M").to_string()
    }

    /// CSVの1行（改行付き、1回のwriteで書き切る）
    pub fn csv_line(&self) -> String {
        format!(
            "{},{},{},{},{}\n",
            self.timestamp_minute(),
            self.pool_count,
            self.pool_capacity,
            self.gym_count,
            self.gym_capacity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn taipei(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
    }

    fn snapshot() -> FacilitySnapshot {
        FacilitySnapshot {
            pool: CategoryReading::new(42, 120),
            gym: CategoryReading::new(15, 60),
        }
    }

    #[test]
    fn test_record_truncates_to_minute() {
        let record = OccupancyRecord::new(taipei(2024, 5, 1, 10, 5, 37), snapshot());
        assert_eq!(record.timestamp_minute(), "2024-05-01 10:05");
    }

    #[test]
    fn test_csv_line_column_order() {
        let record = OccupancyRecord::new(taipei(2024, 5, 1, 10, 5, 0), snapshot());
        assert_eq!(record.csv_line(), "2024-05-01 10:05,42,120,15,60\n");
    }

    #[test]
    fn test_anomalous_reading_passes_through() {
        // current > capacity はソース側の一時的異常。弾かずにそのまま記録する。
        let snap = FacilitySnapshot {
            pool: CategoryReading::new(130, 120),
            gym: CategoryReading::new(0, 60),
        };
        let record = OccupancyRecord::new(taipei(2024, 5, 1, 10, 6, 0), snap);
        assert_eq!(record.pool_count, 130);
        assert_eq!(record.pool_capacity, 120);
    }
}
