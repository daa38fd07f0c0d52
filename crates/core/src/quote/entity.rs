use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// 盘口档位数。
pub const BOOK_DEPTH: usize = 5;

/// # Summary
/// 证券品种分类，决定价格显示的小数位。
///
/// # Invariants
/// - 基金 (ETF/LOF 等) 使用 3 位小数，其余 2 位。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum InstrumentClass {
    #[default]
    Standard,
    Fund,
}

impl InstrumentClass {
    /// # Summary
    /// 根据带前缀代码判断品种。
    ///
    /// # Logic
    /// 1. 取代码的第 3 个字符 (即去掉交易所前缀后的首位数字)。
    /// 2. `1` 或 `5` 开头为基金。
    pub fn from_code(code: &str) -> Self {
        match code.chars().nth(2) {
            Some('1') | Some('5') => InstrumentClass::Fund,
            _ => InstrumentClass::Standard,
        }
    }

    /// 价格类字段的小数位数。
    pub fn precision(&self) -> usize {
        match self {
            InstrumentClass::Standard => 2,
            InstrumentClass::Fund => 3,
        }
    }
}

/// # Summary
/// 单个标的在一次轮询中的原始行情字段。
///
/// # Invariants
/// - 所有数值字段非负，缺失或空文本解析为 0。
/// - 买卖盘数组按档位从一档到五档排列。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RawQuoteRecord {
    // 带交易所前缀的代码，例如 sh600000
    pub code: String,
    // 证券名称
    pub name: String,
    // 开盘价
    pub open: f64,
    // 昨收价
    pub prev_close: f64,
    // 现价
    pub price: f64,
    // 当日最高
    pub high: f64,
    // 当日最低
    pub low: f64,
    // 买一价 (竞买价)
    pub bid: f64,
    // 卖一价 (竞卖价)
    pub ask: f64,
    // 成交量 (股)
    pub volume: f64,
    // 成交额 (元)
    pub turnover: f64,
    // 买一至买五申报量
    pub bid_volumes: [f64; BOOK_DEPTH],
    // 买一至买五价格
    pub bid_prices: [f64; BOOK_DEPTH],
    // 卖一至卖五申报量
    pub ask_volumes: [f64; BOOK_DEPTH],
    // 卖一至卖五价格
    pub ask_prices: [f64; BOOK_DEPTH],
    // 行情日期
    pub date: Option<NaiveDate>,
    // 行情时间
    pub time: Option<NaiveTime>,
}

impl RawQuoteRecord {
    pub fn instrument_class(&self) -> InstrumentClass {
        InstrumentClass::from_code(&self.code)
    }
}

/// # Summary
/// 迷你 K 线所需的五个价格。渲染方只读，不再推导。
///
/// # Invariants
/// - `high >= low`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct KLine {
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub prev_close: f64,
}

/// 现价触及当日高/低点时的提示箭头。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DayArrow {
    #[default]
    None,
    Up,
    Down,
}

impl DayArrow {
    /// 拼接在现价后的符号，无箭头时为一个空格以保持列宽。
    pub fn symbol(&self) -> &'static str {
        match self {
            DayArrow::None => " ",
            DayArrow::Up => "↑",
            DayArrow::Down => "↓",
        }
    }
}

/// 涨跌着色方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Sign {
    Negative,
    #[default]
    Flat,
    Positive,
}

impl Sign {
    /// 按数值正负取方向，0 与 NaN 均视为持平。
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Sign::Positive
        } else if value < 0.0 {
            Sign::Negative
        } else {
            Sign::Flat
        }
    }
}

/// # Summary
/// 每行附带的着色元数据，仅供着色层使用。
///
/// # Invariants
/// - 与显示行一一对应，不参与任何格式化逻辑。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SignVector {
    // 现价/涨跌值/涨跌幅
    pub delta: Sign,
    // 委比
    pub commi: Sign,
    // 均价相对昨收
    pub avg: Sign,
    // 买一标签
    pub b1: Sign,
    // 卖一标签
    pub s1: Sign,
}

/// # Summary
/// 由单条原始行情推导出的全部指标。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    // 校正后的现价 (竞价阶段取撮合价，无成交时回落为昨收)
    pub price: f64,
    // 涨跌值
    pub change: f64,
    // 涨跌幅 (百分数)
    pub change_pct: f64,
    // 委比 (百分数，范围 [-100, 100])
    pub committee_ratio: f64,
    // 均价
    pub average_price: f64,
    // 封单手数，仅在开启封单显示且处于涨跌停时有值
    pub seal_size: Option<u64>,
    // 是否处于集合竞价阶段
    pub is_auction: bool,
    // 竞价未匹配量 (股)，正数表示买方占优
    pub unpaired_volume: f64,
    // 买盘标签
    pub bid_label: String,
    // 卖盘标签
    pub ask_label: String,
    // K 线载荷
    pub kline: KLine,
    // 日高/日低箭头
    pub day_arrow: DayArrow,
    // 品种分类
    pub instrument_class: InstrumentClass,
    // 着色方向
    pub signs: SignVector,
}

/// # Summary
/// 显示行中的单元格。
///
/// # Invariants
/// - 每行恰好有一个 `KLine` 单元格，其余均为文本。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Text(String),
    KLine(KLine),
}

impl Cell {
    /// 文本内容，K 线单元格返回空串。
    pub fn text(&self) -> &str {
        match self {
            Cell::Text(s) => s,
            Cell::KLine(_) => "",
        }
    }
}

/// # Summary
/// 显示表的列，顺序即规范列序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Code,
    Name,
    Price,
    Change,
    ChangePct,
    Bid,
    Ask,
    Committee,
    Volume,
    Turnover,
    Average,
    #[serde(rename = "kline")]
    KLine,
}

impl Column {
    pub const ALL: [Column; 12] = [
        Column::Code,
        Column::Name,
        Column::Price,
        Column::Change,
        Column::ChangePct,
        Column::Bid,
        Column::Ask,
        Column::Committee,
        Column::Volume,
        Column::Turnover,
        Column::Average,
        Column::KLine,
    ];

    /// 表头文字。
    pub fn header(&self) -> &'static str {
        match self {
            Column::Code => "代码",
            Column::Name => "名称",
            Column::Price => "现价",
            Column::Change => "涨跌值",
            Column::ChangePct => "涨跌幅",
            Column::Bid => "买盘",
            Column::Ask => "卖盘",
            Column::Committee => "委比",
            Column::Volume => "成交量",
            Column::Turnover => "成交额",
            Column::Average => "均/封",
            Column::KLine => "K线",
        }
    }

    /// 在规范列序中的下标。
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// 该列着色所依据的方向，无需着色时返回 None。
    pub fn sign_in(&self, signs: &SignVector) -> Option<Sign> {
        match self {
            Column::Price | Column::Change | Column::ChangePct => Some(signs.delta),
            Column::Committee => Some(signs.commi),
            Column::Average => Some(signs.avg),
            Column::Bid => Some(signs.b1),
            Column::Ask => Some(signs.s1),
            _ => None,
        }
    }
}

/// 按规范列序排列的一行单元格。
pub type DisplayRow = Vec<Cell>;

/// # Summary
/// 一次轮询的完整输出：显示行与着色元数据两条平行序列。
///
/// # Invariants
/// - `rows.len() == signs.len()`，且顺序与请求代码顺序一致 (被丢弃的行除外)。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuoteBatch {
    pub rows: Vec<DisplayRow>,
    pub signs: Vec<SignVector>,
}

impl QuoteBatch {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push(&mut self, row: DisplayRow, signs: SignVector) {
        self.rows.push(row);
        self.signs.push(signs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_class_from_code() {
        assert_eq!(InstrumentClass::from_code("sh510300"), InstrumentClass::Fund);
        assert_eq!(InstrumentClass::from_code("sz159915"), InstrumentClass::Fund);
        assert_eq!(InstrumentClass::from_code("sh600000"), InstrumentClass::Standard);
        assert_eq!(InstrumentClass::from_code("sh"), InstrumentClass::Standard);
        assert_eq!(InstrumentClass::Fund.precision(), 3);
    }

    #[test]
    fn test_sign_of() {
        assert_eq!(Sign::of(0.01), Sign::Positive);
        assert_eq!(Sign::of(-3.0), Sign::Negative);
        assert_eq!(Sign::of(0.0), Sign::Flat);
        assert_eq!(Sign::of(f64::NAN), Sign::Flat);
    }

    #[test]
    fn test_column_order_matches_index() {
        for (i, col) in Column::ALL.iter().enumerate() {
            assert_eq!(col.index(), i);
        }
    }

    #[test]
    fn test_cell_serde_tagged() {
        let cell = Cell::KLine(KLine {
            open: 1.0,
            close: 2.0,
            high: 2.5,
            low: 0.5,
            prev_close: 1.5,
        });
        let json = serde_json::to_string(&cell).unwrap();
        assert!(json.starts_with("{\"KLine\""));
    }
}
