//! 取得コントローラ
//!
//! 試行は最大2回。まず軽量フェッチ、両カテゴリが揃わなければ
//! レンダリングフェッチで1回だけやり直す。それでも失敗したら
//! 失敗したカテゴリ・段階を示すエラーで実行全体を失敗させる。
//! 1回の実行内での再試行はしない（次回実行がリトライの役割を持つ）。

use tracing::{info, warn};

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::extract;
use crate::fetch::{BrowserFetcher, HttpFetcher};
use crate::traits::Fetcher;

use super::types::FacilitySnapshot;

/// 取得試行の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    /// 軽量パス（HTTP GETのみ）
    Lightweight,
    /// フォールバックパス（ヘッドレスブラウザ）
    Rendered,
}

/// 取得コントローラ
///
/// フェッチャーはトレイト経由で差し替え可能。本番は
/// `HttpFetcher` + `BrowserFetcher`、テストではフィクスチャを返す
/// モックを注入する。
pub struct OccupancyScraper<L, R>
where
    L: Fetcher,
    R: Fetcher,
{
    config: ScrapeConfig,
    lightweight: L,
    rendering: R,
}

impl OccupancyScraper<HttpFetcher, BrowserFetcher> {
    pub fn new(config: ScrapeConfig) -> Result<Self, ScrapeError> {
        let lightweight = HttpFetcher::new(config.fetch_timeout)?;
        let rendering = BrowserFetcher::new(&config);
        Ok(Self {
            config,
            lightweight,
            rendering,
        })
    }
}

impl<L, R> OccupancyScraper<L, R>
where
    L: Fetcher,
    R: Fetcher,
{
    pub fn with_fetchers(config: ScrapeConfig, lightweight: L, rendering: R) -> Self {
        Self {
            config,
            lightweight,
            rendering,
        }
    }

    /// 1回の実行。スナップショット（4値揃い）か型付きエラーを返す。
    pub async fn scrape(&self) -> Result<FacilitySnapshot, ScrapeError> {
        let mut attempt = Attempt::Lightweight;

        loop {
            match self.run_attempt(attempt).await {
                Ok(snapshot) => {
                    info!(
                        "取得成功 ({:?}): 游泳池 {}/{} 健身房 {}/{}",
                        attempt,
                        snapshot.pool.current,
                        snapshot.pool.capacity,
                        snapshot.gym.current,
                        snapshot.gym.capacity
                    );
                    return Ok(snapshot);
                }
                Err(e) if attempt == Attempt::Lightweight && e.is_recoverable() => {
                    warn!("軽量パス失敗、レンダリングパスへフォールバック: {}", e);
                    attempt = Attempt::Rendered;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn run_attempt(&self, attempt: Attempt) -> Result<FacilitySnapshot, ScrapeError> {
        let html = match attempt {
            Attempt::Lightweight => self.lightweight.fetch(&self.config.url).await?,
            Attempt::Rendered => self.rendering.fetch(&self.config.url).await?,
        };

        let text = extract::page_text(&html);
        let result = extract::extract_snapshot(&text, &self.config.center, self.config.scan_window);

        // レンダリングしても解析できない場合はマークアップが変わった
        // 可能性が高いので、HTMLを残して人が調べられるようにする
        if result.is_err() && attempt == Attempt::Rendered && self.config.debug_snapshot {
            self.save_snapshot(&html);
        }

        result
    }

    fn save_snapshot(&self, html: &str) {
        let dir = self
            .config
            .csv_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| std::path::PathBuf::from("."));
        let path = dir.join("last_page.html");

        if let Err(e) = std::fs::create_dir_all(&dir).and_then(|_| std::fs::write(&path, html)) {
            warn!("HTMLスナップショット保存失敗: {}", e);
        } else {
            warn!("解析失敗: HTMLを保存しました: {:?}", path);
        }
    }
}
