//! 新浪行情文本的逐行拆分。
//!
//! 每行形如 `var hq_str_sh600000="浦发银行,10.01,9.98,...";`，
//! 引号内为逗号分隔的字段，键名第 3 段为带前缀的证券代码。

use chrono::{NaiveDate, NaiveTime};
use stockbar_core::quote::entity::{BOOK_DEPTH, RawQuoteRecord};
use tracing::debug;

/// 一条有效记录至少需要的字段数 (名称 + 9 个行情字段 + 十档盘口)。
pub const MIN_FIELDS: usize = 30;

// 字段下标
const NAME: usize = 0;
const OPEN: usize = 1;
const PREV_CLOSE: usize = 2;
const PRICE: usize = 3;
const HIGH: usize = 4;
const LOW: usize = 5;
const BID: usize = 6;
const ASK: usize = 7;
const VOLUME: usize = 8;
const TURNOVER: usize = 9;
const BID_BOOK: usize = 10;
const ASK_BOOK: usize = 20;
const DATE: usize = 30;
const TIME: usize = 31;

/// # Summary
/// 将一次批量请求的完整响应拆分为逐标的的原始记录。
///
/// # Logic
/// 1. 按行切分，逐行调用 `parse_line`。
/// 2. 格式错误的行被静默丢弃，不影响其余标的。
///
/// # Arguments
/// * `text`: 完整响应文本。
///
/// # Returns
/// 按输入顺序排列的记录列表，可能为空。
pub fn split_response(text: &str) -> Vec<RawQuoteRecord> {
    text.lines().filter_map(parse_line).collect()
}

/// # Summary
/// 解析单行行情文本。
///
/// # Logic
/// 1. 没有引号包裹的载荷则跳过。
/// 2. 键名按 `_` 切分，取第 3 段作为代码。
/// 3. 载荷按 `,` 切分，不足 30 个字段视为不完整。
/// 4. 数值字段为空或无法解析时取 0。
///
/// # Arguments
/// * `line`: 单行文本。
///
/// # Returns
/// 有效时返回记录，否则返回 None。
pub fn parse_line(line: &str) -> Option<RawQuoteRecord> {
    let mut parts = line.split('"');
    let key = parts.next()?;
    let Some(payload) = parts.next() else {
        if !line.trim().is_empty() {
            debug!("Skip line without quoted payload: {}", line.trim());
        }
        return None;
    };

    let Some(code) = code_from_key(key) else {
        debug!("Skip line without code segment: {}", key.trim());
        return None;
    };

    let fields: Vec<&str> = payload.split(',').collect();
    if fields.len() < MIN_FIELDS {
        debug!(
            "Skip incomplete record for {}: {} fields",
            code,
            fields.len()
        );
        return None;
    }

    let num = |i: usize| parse_number(fields.get(i).copied().unwrap_or_default());
    let level = |base: usize, offset: usize| -> [f64; BOOK_DEPTH] {
        std::array::from_fn(|lvl| num(base + lvl * 2 + offset))
    };

    Some(RawQuoteRecord {
        name: fields[NAME].trim().to_string(),
        open: num(OPEN),
        prev_close: num(PREV_CLOSE),
        price: num(PRICE),
        high: num(HIGH),
        low: num(LOW),
        bid: num(BID),
        ask: num(ASK),
        volume: num(VOLUME),
        turnover: num(TURNOVER),
        bid_volumes: level(BID_BOOK, 0),
        bid_prices: level(BID_BOOK, 1),
        ask_volumes: level(ASK_BOOK, 0),
        ask_prices: level(ASK_BOOK, 1),
        date: fields
            .get(DATE)
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()),
        time: fields
            .get(TIME)
            .and_then(|s| NaiveTime::parse_from_str(s.trim(), "%H:%M:%S").ok()),
        code,
    })
}

/// 从 `var hq_str_sh600000=` 形式的键名中取出 `sh600000`。
fn code_from_key(key: &str) -> Option<String> {
    let segment = key.split('_').nth(2)?;
    let code = segment.trim().trim_end_matches('=').trim();
    (!code.is_empty()).then(|| code.to_lowercase())
}

/// 宽松数值解析：空串、非法文本与非有限值一律为 0。
fn parse_number(s: &str) -> f64 {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUFA: &str = "var hq_str_sh600000=\"浦发银行,10.010,9.980,10.050,10.100,9.950,10.040,10.050,35468200,356123456.000,1200,10.040,3300,10.030,5000,10.020,800,10.010,900,10.000,2100,10.050,4000,10.060,600,10.070,700,10.080,1500,10.090,2024-05-10,15:00:00,00\";";

    #[test]
    fn test_parse_full_line() {
        let rec = parse_line(PUFA).unwrap();
        assert_eq!(rec.code, "sh600000");
        assert_eq!(rec.name, "浦发银行");
        assert_eq!(rec.open, 10.01);
        assert_eq!(rec.prev_close, 9.98);
        assert_eq!(rec.price, 10.05);
        assert_eq!(rec.bid, 10.04);
        assert_eq!(rec.ask, 10.05);
        assert_eq!(rec.volume, 35_468_200.0);
        assert_eq!(rec.bid_volumes, [1200.0, 3300.0, 5000.0, 800.0, 900.0]);
        assert_eq!(rec.bid_prices[4], 10.0);
        assert_eq!(rec.ask_volumes[0], 2100.0);
        assert_eq!(rec.ask_prices, [10.05, 10.06, 10.07, 10.08, 10.09]);
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2024, 5, 10));
        assert_eq!(rec.time, NaiveTime::from_hms_opt(15, 0, 0));
    }

    #[test]
    fn test_empty_fields_parse_to_zero() {
        let mut fields = vec![""; 30];
        fields[0] = "新股";
        let line = format!("var hq_str_sz301000=\"{}\";", fields.join(","));
        let rec = parse_line(&line).unwrap();
        assert_eq!(rec.price, 0.0);
        assert_eq!(rec.bid_volumes, [0.0; BOOK_DEPTH]);
        assert!(rec.date.is_none());
    }

    #[test]
    fn test_short_or_unquoted_lines_dropped() {
        let short = format!("var hq_str_sh600001=\"{}\";", vec!["1"; 20].join(","));
        assert!(parse_line(&short).is_none());
        assert!(parse_line("var hq_str_sh600002=;").is_none());
        assert!(parse_line("").is_none());
        assert!(parse_line("garbage=\"1,2,3\"").is_none());
    }

    #[test]
    fn test_split_preserves_order_and_drops_bad_lines() {
        let short = format!("var hq_str_sh600001=\"{}\";", vec!["1"; 20].join(","));
        let other = PUFA.replace("sh600000", "sz000001");
        let text = format!("{PUFA}\n{short}\n\r\n{other}\n");
        let records = split_response(&text);
        let codes: Vec<&str> = records.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["sh600000", "sz000001"]);
        assert!(split_response("").is_empty());
    }
}
