use async_trait::async_trait;

use crate::error::ScrapeError;

/// ページ取得の共通インターフェース
///
/// 軽量フェッチ（HTTP GET）とレンダリングフェッチ（ヘッドレスブラウザ）の
/// 両方が実装する。テストではフィクスチャを返すモックを注入できる。
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// URLのページ内容をHTMLとして取得
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}
