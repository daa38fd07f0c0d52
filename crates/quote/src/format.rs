use crate::derive::format_price;
use stockbar_core::common::strip_exchange_prefix;
use stockbar_core::config::DisplayConfig;
use stockbar_core::quote::entity::{Cell, DerivedMetrics, DisplayRow, RawQuoteRecord};

const WAN: f64 = 1e4;
const YI: f64 = 1e8;
const WAN_YI: f64 = 1e12;

/// # Summary
/// 成交量/成交额的中文数量级缩写。
///
/// # Logic
/// 1. 先按目标精度舍入再判断单位，舍入后进位到 1 万的值归入下一级单位。
/// 2. 小于 1 万：整数原样显示。
/// 3. 小于 1 亿：以"万"为单位，保留 2 位小数。
/// 4. 小于 1 万亿：以"亿"为单位。
/// 5. 其余：以"万亿"为单位。
pub fn format_magnitude(value: f64) -> String {
    if value.round() < WAN {
        format!("{:.0}", value)
    } else if round_cents(value / WAN) < WAN {
        format!("{:.2}万", value / WAN)
    } else if round_cents(value / YI) < WAN {
        format!("{:.2}亿", value / YI)
    } else {
        format!("{:.2}万亿", value / WAN_YI)
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 封单手数，满 1 万手以 `w` 为单位显示。
pub fn format_seal(lots: u64) -> String {
    if lots < 10_000 {
        lots.to_string()
    } else {
        // 手数远小于 2^52，转换无精度损失
        #[allow(clippy::cast_precision_loss)]
        let wan = lots as f64 / WAN;
        format!("{:.1}w", wan)
    }
}

/// 按字符数截断名称，0 表示不截断。
pub fn truncate_name(name: &str, width: usize) -> String {
    if width == 0 {
        name.to_string()
    } else {
        name.chars().take(width).collect()
    }
}

/// # Summary
/// 按规范列序组装一行显示单元格。
///
/// # Logic
/// 1. 代码可按配置去掉交易所前缀，名称可按配置截断。
/// 2. 价格与涨跌值按品种精度 (2 或 3 位) 格式化，现价后附日高/日低箭头。
/// 3. 涨跌幅与委比固定 2 位小数并带符号。
/// 4. 成交量与成交额使用中文数量级缩写。
/// 5. 均价列在存在封单时显示封单手数，均价非正时留空。
/// 6. 最后一列为 K 线载荷。
///
/// # Arguments
/// * `rec`: 原始记录。
/// * `m`: 推导指标。
/// * `config`: 显示参数。
///
/// # Returns
/// 与 `Column::ALL` 顺序一致的单元格序列。
pub fn format_row(rec: &RawQuoteRecord, m: &DerivedMetrics, config: &DisplayConfig) -> DisplayRow {
    let class = m.instrument_class;
    let precision = class.precision();

    let code = if config.shorten_code {
        strip_exchange_prefix(&rec.code).to_string()
    } else {
        rec.code.clone()
    };

    let average = match m.seal_size {
        Some(lots) => format_seal(lots),
        None if m.average_price > 0.0 => format_price(m.average_price, class),
        None => String::new(),
    };

    vec![
        Cell::Text(code),
        Cell::Text(truncate_name(&rec.name, config.name_width)),
        Cell::Text(format!(
            "{}{}",
            format_price(m.price, class),
            m.day_arrow.symbol()
        )),
        Cell::Text(format!("{:+.*}", precision, m.change)),
        Cell::Text(format!("{:+.2}%", m.change_pct)),
        Cell::Text(m.bid_label.clone()),
        Cell::Text(m.ask_label.clone()),
        Cell::Text(format!("{:+.2}%", m.committee_ratio)),
        Cell::Text(format_magnitude(rec.volume)),
        Cell::Text(format_magnitude(rec.turnover)),
        Cell::Text(average),
        Cell::KLine(m.kline),
    ]
}
