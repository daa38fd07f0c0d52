use thiserror::Error;

/// # Summary
/// 行情域错误枚举。只有输入与传输层的问题会越过核心边界。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 单条记录格式错误、零成交量等退化数值从不产生错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    // 关注列表为空，在发起任何网络请求前返回
    #[error("No instruments selected")]
    NoInstruments,
    // 网络层错误 (连接失败、超时、非 2xx 状态)
    #[error("Network error: {0}")]
    Network(String),
    // 响应体无法读取或解码
    #[error("Parse error: {0}")]
    Parse(String),
    // 配置加载或校验失败
    #[error("Config error: {0}")]
    Config(String),
}

impl QuoteError {
    /// # Summary
    /// 面向最终用户的本地化提示文本。
    ///
    /// # Logic
    /// 1. 网络错误统一提示"无网络连接"，不暴露底层细节。
    /// 2. 空列表提示"未选择股票"。
    /// 3. 其余错误直接使用错误描述。
    pub fn user_message(&self) -> String {
        match self {
            QuoteError::NoInstruments => "未选择股票".to_string(),
            QuoteError::Network(_) => "无网络连接".to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, QuoteError::Network(_))
    }
}
