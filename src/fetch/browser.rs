use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use super::USER_AGENT;
use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::traits::Fetcher;

/// Cookie取得のためルートページ滞在後に置く待機（ミリ秒）
const COOKIE_SETTLE_MS: u64 = 1200;
/// ページ安定待機のタイムアウト（ミリ秒）
const PAGE_STABLE_TIMEOUT_MS: u64 = 10000;
/// 安定判定に必要な連続一致回数
const REQUIRED_STABLE_CHECKS: u32 = 3;

/// レンダリングフェッチ
///
/// ヘッドレスブラウザでページのスクリプトを実行し、描画後のHTMLを返す。
/// 軽量フェッチで数値が取れなかった場合にのみ使う重いパス（秒オーダー）。
/// ブラウザは1回のfetchごとに起動し、成功・失敗・タイムアウトの
/// どの経路でも必ず終了させる。
pub struct BrowserFetcher {
    root_url: String,
    headless: bool,
    render_timeout: Duration,
}

impl BrowserFetcher {
    pub fn new(config: &ScrapeConfig) -> Self {
        Self {
            root_url: config.root_url.clone(),
            headless: config.headless,
            render_timeout: config.render_timeout,
        }
    }

    fn browser_config(&self) -> Result<BrowserConfig, ScrapeError> {
        // ユニークなユーザーデータディレクトリを生成
        let unique_id = format!(
            "{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );
        let user_data_dir = std::env::temp_dir().join(format!("occupancy-{}", unique_id));

        // Chrome パスを取得
        let chrome_path = std::env::var("CHROME_PATH")
            .or_else(|_| std::env::var("CHROMIUM_PATH"))
            .unwrap_or_else(|_| "chromium".to_string());

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .user_data_dir(&user_data_dir)
            .window_size(1366, 900);

        if !self.headless {
            builder = builder.with_head();
        }

        builder = builder
            .no_sandbox()
            .request_timeout(Duration::from_secs(60))
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--lang=zh-TW")
            .arg(format!("--user-agent={}", USER_AGENT));

        builder
            .build()
            .map_err(|e| ScrapeError::Render(format!("ブラウザ設定エラー: {}", e)))
    }

    /// ルートページでCookieを取得してからステータスページを描画
    async fn render(&self, browser: &Browser, url: &str) -> Result<String, ScrapeError> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScrapeError::Render(e.to_string()))?;

        // 直接ステータスページへ行くと空ページを返されることがあるため、
        // まずルートに寄ってCookieを得る
        page.goto(self.root_url.as_str())
            .await
            .map_err(|e| ScrapeError::Render(e.to_string()))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| ScrapeError::Render(e.to_string()))?;
        sleep(Duration::from_millis(COOKIE_SETTLE_MS)).await;
        debug!("ルートページにアクセス完了");

        page.goto(url)
            .await
            .map_err(|e| ScrapeError::Render(e.to_string()))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| ScrapeError::Render(e.to_string()))?;

        self.wait_stable(&page).await?;

        let html = page
            .content()
            .await
            .map_err(|e| ScrapeError::Render(e.to_string()))?;

        if let Err(e) = page.close().await {
            debug!("Failed to close page: {}", e);
        }

        Ok(html)
    }

    /// ページが安定するまで待機（HTMLの長さが変化しなくなるまで）
    async fn wait_stable(&self, page: &Page) -> Result<(), ScrapeError> {
        let start = std::time::Instant::now();
        let stable_timeout = Duration::from_millis(PAGE_STABLE_TIMEOUT_MS);

        let mut last_html_len: Option<usize> = None;
        let mut stable_count = 0;

        while start.elapsed() < stable_timeout {
            let result = page
                .evaluate("document.documentElement.outerHTML.length")
                .await;

            match result {
                Ok(val) => {
                    let current_len = val.into_value::<usize>().unwrap_or(0);
                    match last_html_len {
                        Some(last) if last == current_len => {
                            stable_count += 1;
                            if stable_count >= REQUIRED_STABLE_CHECKS {
                                debug!("Page stable after {:?}", start.elapsed());
                                return Ok(());
                            }
                        }
                        _ => stable_count = 0,
                    }
                    last_html_len = Some(current_len);
                }
                Err(e) => {
                    debug!("Page stable check error: {}", e);
                    stable_count = 0;
                }
            }

            sleep(Duration::from_millis(300)).await;
        }

        warn!(
            "Page stable timeout after {:?}, proceeding anyway",
            start.elapsed()
        );
        Ok(())
    }
}

#[async_trait]
impl Fetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        info!("レンダリングフェッチ開始: {}", url);

        let (mut browser, mut handler) = Browser::launch(self.browser_config()?)
            .await
            .map_err(|e| ScrapeError::Render(format!("ブラウザ起動エラー: {}", e)))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!("Browser event: {:?}", event);
            }
        });

        // レンダリング本体はタイムアウトで包み、結果を見る前に
        // 必ずブラウザを終了させる
        let rendered = timeout(self.render_timeout, self.render(&browser, url)).await;

        if let Err(e) = browser.close().await {
            debug!("Failed to close browser: {}", e);
        }
        let _ = browser.wait().await;
        handler_task.abort();

        match rendered {
            Ok(result) => {
                if result.is_ok() {
                    info!("レンダリングフェッチ完了");
                }
                result
            }
            Err(_) => Err(ScrapeError::Render(format!(
                "レンダリングが{}秒以内に完了しませんでした",
                self.render_timeout.as_secs()
            ))),
        }
    }
}
