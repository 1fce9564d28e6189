//! 混雑状況スクレイパーモジュール
//!
//! 軽量フェッチ→レンダリングフェッチの2段構えでページを取得し、
//! 游泳池・健身房の現在人数と容留上限を読み取る。

mod scraper;
mod types;

pub use scraper::OccupancyScraper;
pub use types::{taipei_now, Category, CategoryReading, FacilitySnapshot, OccupancyRecord};
