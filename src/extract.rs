//! ラベル近傍の数値抽出
//!
//! ページ全文から対象運動中心のブロックを切り出し、カテゴリラベルの
//! 近傍（走査ウィンドウ内）に現れる最初の2つの整数を
//! (現在人数, 容留上限) として読み取る。
//!
//! ウィンドウを制限するのは精度のため。ページ後方の無関係な数値を
//! 拾うくらいなら抽出失敗にする。

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

use crate::error::ScrapeError;
use crate::occupancy::{Category, CategoryReading, FacilitySnapshot};

/// 次の運動中心ブロックの開始を示すマーカー
const NEXT_CENTER_MARKER: &str = "運動中心";

static INT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// HTMLをテキストに平坦化（テキストノードを空白区切りで連結）
pub fn page_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 対象運動中心のブロックを切り出す
///
/// 施設名の初出位置から、次に「運動中心」が現れる直前まで。
/// 次のマーカーがなければ末尾まで。
pub fn facility_block<'a>(text: &'a str, center: &str) -> Option<&'a str> {
    let start = text.find(center)?;
    let block = &text[start..];
    match block[center.len()..].find(NEXT_CENTER_MARKER) {
        Some(i) => Some(&block[..center.len() + i]),
        None => Some(block),
    }
}

/// ラベル位置から最大 `window` 文字のウィンドウを返す
fn label_region<'a>(block: &'a str, label: &str, window: usize) -> Option<&'a str> {
    let idx = block.find(label)?;
    Some(truncate_chars(&block[idx..], window))
}

/// 文字数でのプレフィックス（マルチバイト境界を壊さない）
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

/// ウィンドウ内の最初の2整数を (現在人数, 容留上限) として読む
fn numbers_in_region(region: &str) -> Option<CategoryReading> {
    let mut numbers = INT_RE
        .find_iter(region)
        .filter_map(|m| m.as_str().parse::<u32>().ok());
    let current = numbers.next()?;
    let capacity = numbers.next()?;
    Some(CategoryReading::new(current, capacity))
}

/// 1カテゴリ分の読み取り
///
/// ラベルの綴りは複数候補を順に試す（言語切替対策）。
pub fn read_category(
    text: &str,
    center: &str,
    category: Category,
    window: usize,
) -> Result<CategoryReading, ScrapeError> {
    let block = facility_block(text, center).ok_or(ScrapeError::LabelNotFound(category))?;

    let region = category
        .labels()
        .iter()
        .find_map(|label| label_region(block, label, window))
        .ok_or(ScrapeError::LabelNotFound(category))?;

    numbers_in_region(region).ok_or(ScrapeError::NumbersNotFound(category))
}

/// 両カテゴリを読み取り、4値が揃った場合のみスナップショットを返す
pub fn extract_snapshot(
    text: &str,
    center: &str,
    window: usize,
) -> Result<FacilitySnapshot, ScrapeError> {
    let pool = read_category(text, center, Category::Pool, window)?;
    let gym = read_category(text, center, Category::Gym, window)?;
    Ok(FacilitySnapshot { pool, gym })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: usize = 260;
    const CENTER: &str = "大安運動中心";

    #[test]
    fn test_extract_both_categories() {
        let text = "大安運動中心 ... 游泳池 使用人數 42 容留上限 120 \
                    ... 健身房 使用人數 15 容留上限 60";
        let snap = extract_snapshot(text, CENTER, WINDOW).unwrap();
        assert_eq!(snap.pool, CategoryReading::new(42, 120));
        assert_eq!(snap.gym, CategoryReading::new(15, 60));
    }

    #[test]
    fn test_extract_slash_format() {
        // 実ページの表記ゆれ: 「42 人 / 120」形式
        let text = "大安運動中心 游泳池 42 人 / 120 健身房 15 人 / 60";
        let snap = extract_snapshot(text, CENTER, WINDOW).unwrap();
        assert_eq!(snap.pool, CategoryReading::new(42, 120));
        assert_eq!(snap.gym, CategoryReading::new(15, 60));
    }

    #[test]
    fn test_markup_noise_between_label_and_numbers() {
        let text = "大安運動中心 游泳池 <span> 目前 </span> 7 <b>人</b> 上限 45 健身房 3 人 20";
        let snap = extract_snapshot(text, CENTER, WINDOW).unwrap();
        assert_eq!(snap.pool, CategoryReading::new(7, 45));
    }

    #[test]
    fn test_block_ends_at_next_center() {
        // 隣の運動中心の数値を拾ってはいけない
        let text = "大安運動中心 游泳池 42 120 健身房 15 60 中山運動中心 游泳池 99 200 健身房 88 100";
        let snap = extract_snapshot(text, CENTER, WINDOW).unwrap();
        assert_eq!(snap.pool, CategoryReading::new(42, 120));
        assert_eq!(snap.gym, CategoryReading::new(15, 60));
    }

    #[test]
    fn test_english_label_fallback() {
        let text = "大安運動中心 Swimming pool 42 / 120 Fitness 15 / 60";
        let snap = extract_snapshot(text, CENTER, WINDOW).unwrap();
        assert_eq!(snap.pool, CategoryReading::new(42, 120));
        assert_eq!(snap.gym, CategoryReading::new(15, 60));
    }

    #[test]
    fn test_missing_center_is_label_not_found() {
        let err = extract_snapshot("中山運動中心 游泳池 1 2 健身房 3 4", CENTER, WINDOW)
            .unwrap_err();
        assert!(matches!(err, ScrapeError::LabelNotFound(Category::Pool)));
    }

    #[test]
    fn test_missing_gym_label() {
        let err = extract_snapshot("大安運動中心 游泳池 42 120", CENTER, WINDOW).unwrap_err();
        assert!(matches!(err, ScrapeError::LabelNotFound(Category::Gym)));
    }

    #[test]
    fn test_numbers_outside_window_not_scavenged() {
        // ラベルから260文字を超えた位置の数値は使わない
        let padding = "噪".repeat(300);
        let text = format!("大安運動中心 游泳池 {padding} 42 120 健身房 15 60");
        let err = extract_snapshot(&text, CENTER, WINDOW).unwrap_err();
        assert!(matches!(err, ScrapeError::NumbersNotFound(Category::Pool)));
    }

    #[test]
    fn test_single_number_in_window_fails() {
        let padding = "x".repeat(300);
        let text = format!("大安運動中心 游泳池 42 {padding} 120 健身房 15 60");
        let err = extract_snapshot(&text, CENTER, WINDOW).unwrap_err();
        assert!(matches!(err, ScrapeError::NumbersNotFound(Category::Pool)));
    }

    #[test]
    fn test_window_is_configurable() {
        // 同じ入力でもウィンドウを広げれば届く
        let padding = "y".repeat(300);
        let text = format!("大安運動中心 游泳池 {padding} 42 120 健身房 15 60");
        assert!(read_category(&text, CENTER, Category::Pool, 260).is_err());
        let reading = read_category(&text, CENTER, Category::Pool, 400).unwrap();
        assert_eq!(reading, CategoryReading::new(42, 120));
    }

    #[test]
    fn test_page_text_flattens_markup() {
        let html = "<html><body><div>大安運動中心</div>\
                    <span>游泳池</span><b>42</b><i>120</i>\
                    <span>健身房</span><b>15</b><i>60</i></body></html>";
        let text = page_text(html);
        let snap = extract_snapshot(&text, CENTER, 260).unwrap();
        assert_eq!(snap.pool, CategoryReading::new(42, 120));
        assert_eq!(snap.gym, CategoryReading::new(15, 60));
    }
}
