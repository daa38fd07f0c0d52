use stockbar_core::config::{BookMode, DisplayConfig};
use stockbar_core::quote::entity::{
    DayArrow, DerivedMetrics, InstrumentClass, KLine, RawQuoteRecord, Sign, SignVector,
};

/// 每手股数。
pub const LOT_SIZE: f64 = 100.0;

/// 盘口价格缺失时的占位符。
pub const MISSING: &str = "-";

/// 现价与买一/卖一价相同时的主动方向标记。
pub const TRADE_MARKER: &str = "•";

/// 股数折算为整手，向下取整。
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_lots(shares: f64) -> u64 {
    // 输入非负，浮点转整数在越界时饱和
    (shares.max(0.0) / LOT_SIZE).trunc() as u64
}

/// 集合竞价快照的撮合信息。
#[derive(Debug, Clone, Copy, PartialEq)]
struct Auction {
    price: f64,
    // 已匹配量 (股)
    paired: f64,
    // 未匹配量 (股)，正数表示买方剩余
    unpaired: f64,
}

/// # Summary
/// 识别集合竞价快照。
///
/// # Logic
/// 1. 连续竞价现价为 0 且买一价等于卖一价 (且为正) 时视为竞价快照。
/// 2. 匹配量取卖一申报量。
/// 3. 未匹配量优先取卖二申报量 (卖方剩余，记为负)，否则取买二申报量 (买方剩余，记为正)。
fn detect_auction(rec: &RawQuoteRecord) -> Option<Auction> {
    if rec.price != 0.0 || rec.bid <= 0.0 || rec.bid != rec.ask {
        return None;
    }
    let unpaired = if rec.ask_volumes[1] > 0.0 {
        -rec.ask_volumes[1]
    } else {
        rec.bid_volumes[1]
    };
    Some(Auction {
        price: rec.bid,
        paired: rec.ask_volumes[0],
        unpaired,
    })
}

/// # Summary
/// 由单条原始行情推导全部显示指标。
///
/// # Logic
/// 1. 竞价阶段以撮合价作为现价；仍为 0 时回落为昨收 (尚未成交不是错误)。
/// 2. 未开盘 (开盘价为 0) 时开盘、最高、最低均取现价，高低颠倒时交换。
/// 3. 昨收为 0 时涨跌值与涨跌幅均为 0，不做除法。
/// 4. 均价 = 成交额 / 成交量，无成交时取昨收。
/// 5. 委比 = 100 × (买量和 − 卖量和) / (买量和 + 卖量和)，两者皆 0 时为 0。
/// 6. 仅当最高 > 最低且现价等于其一时给出日高/日低箭头。
/// 7. 构造买卖盘标签及着色方向。
/// 8. 开启封单显示时计算涨跌停封单。
///
/// # Arguments
/// * `rec`: 原始记录。
/// * `config`: 显示参数。
///
/// # Returns
/// 推导结果，永不失败。
pub fn derive(rec: &RawQuoteRecord, config: &DisplayConfig) -> DerivedMetrics {
    let class = rec.instrument_class();
    let auction = detect_auction(rec);

    let mut price = auction.map_or(rec.price, |a| a.price);
    if price == 0.0 {
        price = rec.prev_close;
    }

    let (mut open, mut high, mut low) = (rec.open, rec.high, rec.low);
    if open == 0.0 {
        open = price;
        high = price;
        low = price;
    }
    if high < low {
        std::mem::swap(&mut high, &mut low);
    }

    let prev_close = rec.prev_close;
    let (change, change_pct) = if prev_close != 0.0 {
        (price - prev_close, (price / prev_close - 1.0) * 100.0)
    } else {
        (0.0, 0.0)
    };

    let average_price = if rec.volume > 0.0 {
        rec.turnover / rec.volume
    } else {
        prev_close
    };

    let committee_ratio = committee_ratio(&rec.bid_volumes, &rec.ask_volumes);

    let day_arrow = if high > low && price == high {
        DayArrow::Up
    } else if high > low && price == low {
        DayArrow::Down
    } else {
        DayArrow::None
    };

    let kline = if high == low {
        KLine {
            open,
            close: price,
            high: price,
            low: price,
            prev_close,
        }
    } else {
        KLine {
            open,
            close: price,
            high,
            low,
            prev_close,
        }
    };

    // 未成交时现价只是昨收回退值，不标记成交侧
    let traded = (rec.price > 0.0).then_some(price);
    let (bid_label, ask_label, book_sign) = match auction {
        Some(a) => (
            auction_paired_label(a, config.book_mode, class),
            auction_unpaired_label(a, config.book_mode, class),
            Some(Sign::of(a.unpaired)),
        ),
        None => (
            book_label(
                rec.bid,
                rec.bid_volumes[0],
                traded,
                config.book_mode,
                class,
                Side::Bid,
            ),
            book_label(
                rec.ask,
                rec.ask_volumes[0],
                traded,
                config.book_mode,
                class,
                Side::Ask,
            ),
            None,
        ),
    };

    let signs = SignVector {
        delta: Sign::of(change),
        commi: Sign::of(committee_ratio),
        avg: if prev_close > 0.0 {
            Sign::of(average_price - prev_close)
        } else {
            Sign::Flat
        },
        // 连续竞价中买盘固定红色、卖盘固定绿色
        b1: book_sign.unwrap_or(Sign::Positive),
        s1: book_sign.unwrap_or(Sign::Negative),
    };

    DerivedMetrics {
        price,
        change,
        change_pct,
        committee_ratio,
        average_price,
        seal_size: config.show_seal.then(|| seal_size(rec)).flatten(),
        is_auction: auction.is_some(),
        unpaired_volume: auction.map_or(0.0, |a| a.unpaired),
        bid_label,
        ask_label,
        kline,
        day_arrow,
        instrument_class: class,
        signs,
    }
}

/// # Summary
/// 五档委比。
///
/// # Returns
/// 百分数，落在 [-100, 100]；买卖量和均为 0 时返回 0。
pub fn committee_ratio(bids: &[f64], asks: &[f64]) -> f64 {
    let bid_sum: f64 = bids.iter().sum();
    let ask_sum: f64 = asks.iter().sum();
    let total = bid_sum + ask_sum;
    if total > 0.0 {
        (100.0 * (bid_sum - ask_sum) / total).clamp(-100.0, 100.0)
    } else {
        0.0
    }
}

/// # Summary
/// 涨跌停封单手数。
///
/// # Logic
/// 1. 买一价为 0 且卖一有量：跌停，封单为卖一量。
/// 2. 卖一价为 0 且买一有量：涨停，封单为买一量。
/// 3. 不足一手按未封板处理。
pub fn seal_size(rec: &RawQuoteRecord) -> Option<u64> {
    let shares = if rec.bid == 0.0 && rec.ask_volumes[0] > 0.0 {
        rec.ask_volumes[0]
    } else if rec.ask == 0.0 && rec.bid_volumes[0] > 0.0 {
        rec.bid_volumes[0]
    } else {
        return None;
    };
    Some(to_lots(shares)).filter(|&lots| lots > 0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Bid,
    Ask,
}

/// 按品种精度格式化价格。
pub fn format_price(value: f64, class: InstrumentClass) -> String {
    format!("{:.*}", class.precision(), value)
}

fn book_label(
    best: f64,
    volume: f64,
    traded: Option<f64>,
    mode: BookMode,
    class: InstrumentClass,
    side: Side,
) -> String {
    if best == 0.0 {
        return MISSING.to_string();
    }
    let best_text = format_price(best, class);
    let body = match mode {
        BookMode::Qty => to_lots(volume).to_string(),
        BookMode::Price => best_text.clone(),
        BookMode::Both => format!("{}({})", to_lots(volume), best_text),
    };
    // 成交价落在哪一侧，说明哪一方在主动成交
    let hit = traded.is_some_and(|price| format_price(price, class) == best_text);
    match (hit, side) {
        (true, Side::Bid) => format!("{TRADE_MARKER}{body}"),
        (true, Side::Ask) => format!("{body}{TRADE_MARKER}"),
        (false, _) => body,
    }
}

fn auction_paired_label(a: Auction, mode: BookMode, class: InstrumentClass) -> String {
    let price = format_price(a.price, class);
    match mode {
        BookMode::Qty => to_lots(a.paired).to_string(),
        BookMode::Price => price,
        BookMode::Both => format!("{}({})", to_lots(a.paired), price),
    }
}

fn auction_unpaired_label(a: Auction, mode: BookMode, class: InstrumentClass) -> String {
    let lots = to_lots(a.unpaired.abs());
    let signed = match Sign::of(a.unpaired) {
        Sign::Positive => format!("+{lots}"),
        Sign::Negative => format!("-{lots}"),
        Sign::Flat => "0".to_string(),
    };
    match mode {
        BookMode::Qty | BookMode::Price => signed,
        BookMode::Both => format!("{}({})", signed, format_price(a.price, class)),
    }
}
