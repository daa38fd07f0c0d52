use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use stockbar_core::config::{BookMode, DisplayConfig};
use stockbar_core::quote::entity::{Cell, Column, Sign};
use stockbar_core::quote::error::QuoteError;
use stockbar_core::quote::port::QuoteSource;
use stockbar_quote::pipeline::{QuotePipeline, transform};

/// # Summary
/// 为测试提供的模拟行情数据源。
struct MockSource {
    // 预设的响应，None 表示模拟网络故障
    response: Option<String>,
    // 调用次数
    calls: AtomicUsize,
}

impl MockSource {
    fn new(response: Option<String>) -> Arc<Self> {
        Arc::new(Self {
            response,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl QuoteSource for MockSource {
    async fn fetch_raw(&self, _codes: &[String]) -> Result<String, QuoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .clone()
            .ok_or_else(|| QuoteError::Network("connection refused".into()))
    }
}

/// 构造一行新浪格式文本，`fields` 覆盖默认字段。
fn line(code: &str, overrides: &[(usize, &str)]) -> String {
    let mut fields: Vec<String> = vec!["0".to_string(); 32];
    fields[0] = format!("名称{}", &code[2..]);
    fields[30] = "2024-05-10".to_string();
    fields[31] = "10:30:00".to_string();
    for (i, v) in overrides {
        fields[*i] = v.to_string();
    }
    format!("var hq_str_{}=\"{}\";", code, fields.join(","))
}

fn codes(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn cell(row: &[Cell], col: Column) -> String {
    row[col.index()].text().to_string()
}

/// # Summary
/// 空代码列表在网络请求前即失败。
#[tokio::test]
async fn test_empty_codes_fail_before_fetch() {
    let source = MockSource::new(Some(String::new()));
    let pipeline = QuotePipeline::new(source.clone());
    let result = pipeline.refresh(&[], &DisplayConfig::default()).await;
    assert_eq!(result, Err(QuoteError::NoInstruments));
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

/// # Summary
/// 网络错误作为独立类别向上传递。
#[tokio::test]
async fn test_network_error_propagates() {
    let source = MockSource::new(None);
    let pipeline = QuotePipeline::new(source.clone());
    let err = pipeline
        .refresh(&codes(&["sh600000"]), &DisplayConfig::default())
        .await
        .unwrap_err();
    assert!(err.is_network());
    assert_eq!(err.user_message(), "无网络连接");
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

/// # Summary
/// 字段不足的行被静默丢弃，其余标的正常输出且保持请求顺序。
#[tokio::test]
async fn test_malformed_line_dropped_and_order_kept() -> anyhow::Result<()> {
    let short = format!("var hq_str_sz000002=\"{}\";", vec!["1"; 20].join(","));
    let text = [
        line("sz000001", &[(1, "11.00"), (2, "11.00"), (3, "11.10"), (4, "11.20"), (5, "10.90")]),
        short,
        line("sh600000", &[(1, "10.00"), (2, "10.00"), (3, "10.50"), (4, "10.60"), (5, "9.90")]),
    ]
    .join("\n");
    let pipeline = QuotePipeline::new(MockSource::new(Some(text)));

    let batch = pipeline
        .refresh(
            &codes(&["sh600000", "sz000002", "sz000001"]),
            &DisplayConfig::default(),
        )
        .await?;

    assert_eq!(batch.len(), 2);
    assert_eq!(batch.signs.len(), 2);
    assert_eq!(cell(&batch.rows[0], Column::Code), "sh600000");
    assert_eq!(cell(&batch.rows[1], Column::Code), "sz000001");
    Ok(())
}

/// # Summary
/// 连续竞价典型场景：涨 0.50，涨幅 5.00%，现价不在高低点，无箭头。
#[test]
fn test_continuous_trading_scenario() {
    let text = line(
        "sh600000",
        &[
            (1, "10.10"),
            (2, "10.00"),
            (3, "10.50"),
            (4, "10.60"),
            (5, "9.90"),
            (6, "10.49"),
            (7, "10.51"),
            (8, "1000000"),
            (9, "10300000"),
            (10, "3000"),
            (11, "10.49"),
            (20, "1000"),
            (21, "10.51"),
        ],
    );
    let batch = transform(&text, &DisplayConfig::default());
    assert_eq!(batch.len(), 1);
    let row = &batch.rows[0];

    assert_eq!(cell(row, Column::Price), "10.50 ");
    assert_eq!(cell(row, Column::Change), "+0.50");
    assert_eq!(cell(row, Column::ChangePct), "+5.00%");
    assert_eq!(cell(row, Column::Bid), "30");
    assert_eq!(cell(row, Column::Ask), "10");
    assert_eq!(cell(row, Column::Committee), "+50.00%");
    assert_eq!(cell(row, Column::Volume), "100.00万");
    assert_eq!(cell(row, Column::Turnover), "1030.00万");
    assert_eq!(cell(row, Column::Average), "10.30");

    let signs = batch.signs[0];
    assert_eq!(signs.delta, Sign::Positive);
    assert_eq!(signs.commi, Sign::Positive);
    assert_eq!(signs.b1, Sign::Positive);
    assert_eq!(signs.s1, Sign::Negative);

    assert!(matches!(
        &row[Column::KLine.index()],
        Cell::KLine(k) if (k.open, k.close, k.high, k.low, k.prev_close) == (10.10, 10.50, 10.60, 9.90, 10.00)
    ));
}

/// # Summary
/// 集合竞价快照：现价取撮合价 9.99，盘口标签显示匹配量与未匹配量。
#[test]
fn test_call_auction_scenario() {
    let text = line(
        "sh600000",
        &[
            (2, "10.00"),
            (6, "9.99"),
            (7, "9.99"),
            (10, "250000"),
            (11, "9.99"),
            (20, "250000"),
            (21, "9.99"),
            (22, "42000"),
            (23, "10.00"),
        ],
    );
    let config = DisplayConfig {
        book_mode: BookMode::Both,
        ..DisplayConfig::default()
    };
    let batch = transform(&text, &config);
    let row = &batch.rows[0];

    assert_eq!(cell(row, Column::Price), "9.99 ");
    assert_eq!(cell(row, Column::Change), "-0.01");
    assert_eq!(cell(row, Column::Bid), "2500(9.99)");
    assert_eq!(cell(row, Column::Ask), "-420(9.99)");
    assert_eq!(batch.signs[0].b1, Sign::Negative);
    assert_eq!(batch.signs[0].s1, Sign::Negative);
    // 无成交时均价取昨收
    assert_eq!(cell(row, Column::Average), "10.00");
}

/// # Summary
/// 相同输入文本重复转换结果一致。
#[test]
fn test_transform_is_idempotent() {
    let text = line("sz300750", &[(1, "200"), (2, "198"), (3, "201"), (4, "203"), (5, "197")]);
    let config = DisplayConfig::default();
    assert_eq!(transform(&text, &config), transform(&text, &config));
}
