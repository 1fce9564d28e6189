use thiserror::Error;

use crate::occupancy::Category;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("フェッチエラー: {0}")]
    Fetch(String),

    #[error("レンダリングエラー: {0}")]
    Render(String),

    #[error("ラベルが見つかりません: {0}")]
    LabelNotFound(Category),

    #[error("人数が見つかりません: {0}")]
    NumbersNotFound(Category),

    #[error("データセット書き込みエラー: {0}")]
    Persist(#[from] std::io::Error),
}

impl ScrapeError {
    /// フォールバック（レンダリング再試行）で回復できる可能性があるか
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScrapeError::Fetch(_)
                | ScrapeError::LabelNotFound(_)
                | ScrapeError::NumbersNotFound(_)
        )
    }
}
