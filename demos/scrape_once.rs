use occupancy_scraper::{OccupancyScraper, ScrapeConfig};

#[tokio::main]
async fn main() {
    // ログ設定
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config = ScrapeConfig::default().with_headless(false); // デバッグ用に表示モード

    println!("=== Occupancy Scraper Test ===");

    let scraper = match OccupancyScraper::new(config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("初期化エラー: {}", e);
            return;
        }
    };

    match scraper.scrape().await {
        Ok(snapshot) => {
            println!(
                "成功! 游泳池 {}/{} 健身房 {}/{}",
                snapshot.pool.current,
                snapshot.pool.capacity,
                snapshot.gym.current,
                snapshot.gym.capacity
            );
        }
        Err(e) => {
            eprintln!("エラー: {}", e);
        }
    }
}
