use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::Service;
use tracing::info;

use crate::config::ScrapeConfig;
use crate::dataset::{Appended, CsvDataset};
use crate::error::ScrapeError;
use crate::occupancy::{taipei_now, OccupancyRecord, OccupancyScraper};

/// スクレイピングリクエスト
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub url: String,
    pub root_url: String,
    pub csv_path: PathBuf,
    pub scan_window: usize,
    pub headless: bool,
}

impl ScrapeRequest {
    pub fn new() -> Self {
        let defaults = ScrapeConfig::default();
        Self {
            url: defaults.url,
            root_url: defaults.root_url,
            csv_path: defaults.csv_path,
            scan_window: defaults.scan_window,
            headless: defaults.headless,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_csv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.csv_path = path.into();
        self
    }

    pub fn with_scan_window(mut self, window: usize) -> Self {
        self.scan_window = window;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }
}

impl Default for ScrapeRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ScrapeRequest> for ScrapeConfig {
    fn from(req: ScrapeRequest) -> Self {
        ScrapeConfig {
            url: req.url,
            root_url: req.root_url,
            csv_path: req.csv_path,
            scan_window: req.scan_window,
            headless: req.headless,
            ..ScrapeConfig::default()
        }
    }
}

/// スクレイピング結果
#[derive(Debug)]
pub struct ScrapeResult {
    pub record: OccupancyRecord,
    pub appended: Appended,
    pub csv_path: PathBuf,
}

/// tower::Serviceを実装したスクレイパーサービス
///
/// 1リクエスト = 1実行。取得 → レコード組み立て → CSV追記まで行う。
#[derive(Debug, Clone, Default)]
pub struct OccupancyService {
    // 将来的な拡張用（レートリミット、キャッシュなど）
}

impl OccupancyService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Service<ScrapeRequest> for OccupancyService {
    type Response = ScrapeResult;
    type Error = ScrapeError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ScrapeRequest) -> Self::Future {
        info!("スクレイピングリクエスト受信: url={}", req.url);

        Box::pin(async move {
            // 実行開始時刻をレコードのタイムスタンプにする
            let started_at = taipei_now();

            let config: ScrapeConfig = req.into();
            let csv_path = config.csv_path.clone();

            let scraper = OccupancyScraper::new(config)?;
            let snapshot = scraper.scrape().await?;

            let record = OccupancyRecord::new(started_at, snapshot);
            let appended = CsvDataset::new(&csv_path).append(&record)?;

            info!(
                "スクレイピング完了: {} 游泳池 {}/{} 健身房 {}/{} ({:?})",
                record.timestamp_minute(),
                record.pool_count,
                record.pool_capacity,
                record.gym_count,
                record.gym_capacity,
                appended
            );

            Ok(ScrapeResult {
                record,
                appended,
                csv_path,
            })
        })
    }
}
