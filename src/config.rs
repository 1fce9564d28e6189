use std::path::PathBuf;
use std::time::Duration;

/// ステータスページのURL
pub const PEOPLE_URL: &str = "https://booking-tpsc.sporetrofit.com/Home/LocationPeopleNum";
/// サイトのルートURL（Cookie取得用）
pub const ROOT_URL: &str = "https://booking-tpsc.sporetrofit.com/";
/// 対象の運動中心
pub const TARGET_CENTER: &str = "大安運動中心";

/// ラベルから数値を探す走査ウィンドウ（文字数）
const DEFAULT_SCAN_WINDOW: usize = 260;

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub url: String,
    pub root_url: String,
    pub center: String,
    pub csv_path: PathBuf,
    /// ラベル位置から数値を探す最大文字数
    pub scan_window: usize,
    pub headless: bool,
    /// 軽量フェッチのタイムアウト
    pub fetch_timeout: Duration,
    /// レンダリングフェッチ全体のタイムアウト
    pub render_timeout: Duration,
    /// 解析失敗時にHTMLスナップショットを保存するか
    pub debug_snapshot: bool,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            url: PEOPLE_URL.to_string(),
            root_url: ROOT_URL.to_string(),
            center: TARGET_CENTER.to_string(),
            csv_path: PathBuf::from("data/da_an_people.csv"),
            scan_window: DEFAULT_SCAN_WINDOW,
            headless: true,
            fetch_timeout: Duration::from_secs(10),
            render_timeout: Duration::from_secs(60),
            debug_snapshot: true,
        }
    }
}

impl ScrapeConfig {
    pub fn new() -> Self {
        Self::default()
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

    pub fn with_render_timeout(mut self, timeout: Duration) -> Self {
        self.render_timeout = timeout;
        self
    }
}
