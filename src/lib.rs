//! 混雑状況スクレイパーライブラリ
//!
//! 台北市大安運動中心のステータスページから游泳池・健身房の
//! 現在人数と容留上限を取得し、CSVデータセットに1行追記する。
//!
//! 取得は2段構え:
//! 1. 軽量フェッチ（HTTP GET）— 安く速いが、クライアント側で
//!    描画される数値は含まれないことがある
//! 2. レンダリングフェッチ（ヘッドレスブラウザ）— 軽量パスで
//!    4値が揃わなかった場合のみ1回だけ実行
//!
//! # 使用例
//!
//! ```rust,ignore
//! use occupancy_scraper::{OccupancyService, ScrapeRequest};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = OccupancyService::new();
//!
//!     let request = ScrapeRequest::new()
//!         .with_csv_path("data/da_an_people.csv");
//!
//!     let result = service.call(request).await.unwrap();
//!     println!("Appended: {:?}", result.record);
//! }
//! ```
//!
//! # スクレイパー単体の使用例
//!
//! ```rust,ignore
//! use occupancy_scraper::{OccupancyScraper, ScrapeConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let scraper = OccupancyScraper::new(ScrapeConfig::default()).unwrap();
//!     let snapshot = scraper.scrape().await.unwrap();
//!     println!("游泳池: {}/{}", snapshot.pool.current, snapshot.pool.capacity);
//! }
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod occupancy;
pub mod service;
pub mod traits;

// 主要な型をリエクスポート
pub use config::ScrapeConfig;
pub use dataset::{Appended, CsvDataset};
pub use error::ScrapeError;
pub use fetch::{BrowserFetcher, HttpFetcher};
pub use service::{OccupancyService, ScrapeRequest, ScrapeResult};
pub use traits::Fetcher;

// 混雑状況関連の型もリエクスポート
pub use occupancy::{
    taipei_now, Category, CategoryReading, FacilitySnapshot, OccupancyRecord, OccupancyScraper,
};
