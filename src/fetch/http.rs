use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use super::USER_AGENT;
use crate::error::ScrapeError;
use crate::traits::Fetcher;

/// 軽量フェッチ（HTTP GETのみ、スクリプト実行なし）
///
/// サーバーの初期レスポンスをそのまま返すため、クライアント側で
/// 描画される数値は含まれないことがある。その場合は
/// `BrowserFetcher` へのフォールバックで拾う。
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ScrapeError::Fetch(format!("HTTPクライアント構築エラー: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        info!("軽量フェッチ開始: {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept-Language", "zh-TW,zh;q=0.9,en;q=0.5")
            .send()
            .await
            .map_err(|e| ScrapeError::Fetch(e.to_string()))?
            .error_for_status()
            .map_err(|e| ScrapeError::Fetch(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| ScrapeError::Fetch(e.to_string()))?;

        debug!("軽量フェッチ完了: {}bytes", body.len());
        Ok(body)
    }
}
