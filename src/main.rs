//! スケジューラから起動されるエントリポイント
//!
//! 1プロセス = 1実行。終了コードで成否を伝える
//! （0 = 成功、1 = 失敗。失敗時はデータセットを変更しない）。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tower::Service;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use occupancy_scraper::{OccupancyService, ScrapeRequest};

#[derive(Parser, Debug)]
#[command(name = "occupancy-scraper")]
#[command(about = "大安運動中心の混雑状況を取得してCSVに追記する")]
struct Args {
    /// 追記先CSVファイル
    #[arg(long, default_value = "data/da_an_people.csv")]
    csv: PathBuf,

    /// ステータスページのURL
    #[arg(long)]
    url: Option<String>,

    /// ラベルから数値を探す走査ウィンドウ（文字数）
    #[arg(long, default_value_t = 260)]
    scan_window: usize,

    /// ブラウザを表示モードで起動（デバッグ用）
    #[arg(long)]
    no_headless: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut request = ScrapeRequest::new()
        .with_csv_path(args.csv)
        .with_scan_window(args.scan_window)
        .with_headless(!args.no_headless);
    if let Some(url) = args.url {
        request = request.with_url(url);
    }

    let mut service = OccupancyService::new();

    match service.call(request).await {
        Ok(result) => {
            info!(
                "OK: {} -> {:?}",
                result.record.timestamp_minute(),
                result.csv_path
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            // 失敗した段階を残す（マークアップ変更の調査の手がかり）
            error!("実行失敗: {}", e);
            ExitCode::FAILURE
        }
    }
}
