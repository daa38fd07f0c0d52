use crate::derive::derive;
use crate::format::format_row;
use crate::parser::split_response;
use std::sync::Arc;
use stockbar_core::config::DisplayConfig;
use stockbar_core::quote::entity::{DisplayRow, QuoteBatch, RawQuoteRecord, SignVector};
use stockbar_core::quote::error::QuoteError;
use stockbar_core::quote::port::QuoteSource;
use tracing::{debug, warn};

/// # Summary
/// 单条记录到显示行与着色元数据的完整转换。
pub fn build_row(rec: &RawQuoteRecord, config: &DisplayConfig) -> (DisplayRow, SignVector) {
    let metrics = derive(rec, config);
    (format_row(rec, &metrics, config), metrics.signs)
}

/// # Summary
/// 纯转换步骤：原始响应文本 → 显示批次。
///
/// # Logic
/// 1. 拆分响应为原始记录，格式错误的行已被丢弃。
/// 2. 逐条推导指标并格式化，各标的之间互不影响。
///
/// # Arguments
/// * `text`: 完整响应文本。
/// * `config`: 显示参数。
///
/// # Returns
/// 行序与响应行序一致的批次，可能为空。
pub fn transform(text: &str, config: &DisplayConfig) -> QuoteBatch {
    assemble(&split_response(text), config)
}

fn assemble(records: &[RawQuoteRecord], config: &DisplayConfig) -> QuoteBatch {
    let mut batch = QuoteBatch::default();
    for rec in records {
        let (row, signs) = build_row(rec, config);
        batch.push(row, signs);
    }
    batch
}

/// # Summary
/// 行情管线驱动器：一次网络抓取 + 一次纯转换。
///
/// # Invariants
/// - 不持有跨轮询的可变状态，相同输入文本总是产生相同输出。
#[derive(Clone)]
pub struct QuotePipeline {
    // 原始文本数据源
    source: Arc<dyn QuoteSource>,
}

impl QuotePipeline {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self { source }
    }

    /// # Summary
    /// 执行一次完整刷新。
    ///
    /// # Logic
    /// 1. 代码列表为空时立即返回 `NoInstruments`，不发起网络请求。
    /// 2. 通过数据源抓取原始文本，网络错误原样向上传递。
    /// 3. 拆分、推导、格式化。
    /// 4. 按请求代码顺序重排结果 (数据源返回顺序不可信时兜底)。
    ///
    /// # Arguments
    /// * `codes`: 规范化后的代码列表。
    /// * `config`: 显示参数。
    ///
    /// # Returns
    /// 成功返回显示批次；只有输入错误与传输错误会失败。
    pub async fn refresh(
        &self,
        codes: &[String],
        config: &DisplayConfig,
    ) -> Result<QuoteBatch, QuoteError> {
        if codes.is_empty() {
            return Err(QuoteError::NoInstruments);
        }

        let text = self.source.fetch_raw(codes).await.inspect_err(|e| {
            warn!("Quote fetch failed: {}", e);
        })?;

        let mut records = split_response(&text);
        if records.len() < codes.len() {
            debug!(
                "Received {} of {} requested instruments",
                records.len(),
                codes.len()
            );
        }
        records.sort_by_key(|rec| {
            codes
                .iter()
                .position(|c| c == &rec.code)
                .unwrap_or(codes.len())
        });

        Ok(assemble(&records, config))
    }
}
