//! ページ取得
//!
//! - `HttpFetcher`: スクリプト実行なしの軽量HTTP GET
//! - `BrowserFetcher`: ヘッドレスブラウザによるレンダリングフェッチ（フォールバック用）

mod browser;
mod http;

pub use browser::BrowserFetcher;
pub use http::HttpFetcher;

/// 通常のデスクトップブラウザに見せるUA（ボット判定回避）
pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";
