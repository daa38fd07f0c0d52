use crate::quote::error::QuoteError;
use async_trait::async_trait;

/// # Summary
/// 行情文本数据源接口 (原始数据提供者)。
///
/// # Invariants
/// - 实现者只负责取回原始文本，不做任何字段解析。
/// - 超时由实现者自行控制，核心管线不做超时处理。
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// # Summary
    /// 批量获取一组标的的原始行情文本。
    ///
    /// # Logic
    /// 1. 将代码列表拼接为数据源要求的请求格式。
    /// 2. 执行网络请求并以文本形式返回完整响应体。
    ///
    /// # Arguments
    /// * `codes`: 已规范化的带前缀代码列表，非空。
    ///
    /// # Returns
    /// 成功返回响应文本 (每行一个标的)，网络失败返回 `QuoteError::Network`。
    async fn fetch_raw(&self, codes: &[String]) -> Result<String, QuoteError>;
}
