use crate::common::{CodeList, DEFAULT_CODE};
use crate::quote::entity::Column;
use serde::{Deserialize, Deserializer, Serialize};

/// 刷新间隔的允许范围 (秒)。
pub const MIN_REFRESH_SECONDS: u64 = 1;
pub const MAX_REFRESH_SECONDS: u64 = 60;

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    // 接受字符串数组，或逗号分隔的单个字符串 (环境变量)
    #[serde(deserialize_with = "deserialize_codes")]
    pub codes: Vec<String>,
    pub refresh_seconds: u64,
    pub display: DisplayConfig,
    // 可见列，仅供展示层投影使用
    pub columns: Vec<Column>,
    // 是否显示表头
    pub header_visible: bool,
    // 按涨跌着色
    pub colorful: bool,
    pub feed: FeedConfig,
    pub log: LogConfig,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CodesInput {
    Joined(String),
    List(Vec<String>),
}

/// # Summary
/// 反序列化代码列表。
///
/// # Logic
/// 1. 数组按原样接收。
/// 2. 单个字符串按逗号拆分，空段丢弃；裸代码的前导零原样保留。
fn deserialize_codes<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match CodesInput::deserialize(deserializer)? {
        CodesInput::List(codes) => codes,
        CodesInput::Joined(text) => text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

/// # Summary
/// 每次轮询传入管线的显示参数。
///
/// # Invariants
/// - 管线只读取，不持有、不持久化。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    // 买卖盘标签显示方式
    pub book_mode: BookMode,
    // 是否去掉代码的交易所前缀
    pub shorten_code: bool,
    // 名称最多显示的字符数，0 表示不限制
    pub name_width: usize,
    // 涨跌停时在均价列显示封单
    pub show_seal: bool,
}

/// 买卖盘标签的显示方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookMode {
    // 仅显示手数
    #[default]
    #[serde(alias = "quantity")]
    Qty,
    // 仅显示价格
    Price,
    // 手数 + 价格
    Both,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub base_url: String,
    pub referer: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    // 日志文件目录，为空时只输出到终端
    pub dir: Option<String>,
    // tracing EnvFilter 语法，RUST_LOG 优先
    pub filter: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            codes: vec![DEFAULT_CODE.to_string()],
            refresh_seconds: 2,
            display: DisplayConfig::default(),
            columns: vec![Column::Price, Column::ChangePct],
            header_visible: false,
            colorful: false,
            feed: FeedConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            book_mode: BookMode::Qty,
            shorten_code: false,
            name_width: 0,
            show_seal: false,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://hq.sinajs.cn/list=".to_string(),
            referer: "https://finance.sina.com.cn".to_string(),
            timeout_secs: 3,
        }
    }
}

impl AppConfig {
    /// # Summary
    /// 规整外部加载的配置。
    ///
    /// # Logic
    /// 1. 代码列表逐项规范化、去重，结果为空时回落到默认标的。
    /// 2. 刷新间隔夹到 [1, 60] 秒。
    /// 3. 可见列为空时使用默认列 (现价、涨跌幅)。
    ///
    /// # Returns
    /// 规整后的配置。
    pub fn normalized(mut self) -> Self {
        self.codes = CodeList::from_inputs(&self.codes).codes_or_default();
        self.refresh_seconds = self
            .refresh_seconds
            .clamp(MIN_REFRESH_SECONDS, MAX_REFRESH_SECONDS);
        if self.columns.is_empty() {
            self.columns = AppConfig::default().columns;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.codes, vec!["sh000001"]);
        assert_eq!(config.refresh_seconds, 2);
        assert_eq!(config.display.book_mode, BookMode::Qty);
        assert_eq!(config.display.name_width, 0);
        assert_eq!(config.feed.timeout_secs, 3);
        assert!(config.log.dir.is_none());
    }

    #[test]
    fn test_normalized_config() {
        let config = AppConfig {
            codes: vec!["600000".into(), "sh600000".into(), "oops".into()],
            refresh_seconds: 0,
            columns: vec![],
            ..AppConfig::default()
        }
        .normalized();
        assert_eq!(config.codes, vec!["sh600000"]);
        assert_eq!(config.refresh_seconds, 1);
        assert_eq!(config.columns, vec![Column::Price, Column::ChangePct]);

        let empty = AppConfig {
            codes: vec![],
            refresh_seconds: 600,
            ..AppConfig::default()
        }
        .normalized();
        assert_eq!(empty.codes, vec!["sh000001"]);
        assert_eq!(empty.refresh_seconds, 60);
    }

    #[test]
    fn test_codes_from_joined_string() {
        let config: AppConfig =
            serde_json::from_str(r#"{"codes": "000001, sh600000,,"}"#).unwrap();
        assert_eq!(config.codes, vec!["000001", "sh600000"]);
        assert_eq!(config.normalized().codes, vec!["sz000001", "sh600000"]);

        let config: AppConfig = serde_json::from_str(r#"{"codes": ["510300"]}"#).unwrap();
        assert_eq!(config.codes, vec!["510300"]);
    }

    #[test]
    fn test_book_mode_serde() {
        let mode: BookMode = serde_json::from_str("\"both\"").unwrap();
        assert_eq!(mode, BookMode::Both);
        let mode: BookMode = serde_json::from_str("\"quantity\"").unwrap();
        assert_eq!(mode, BookMode::Qty);
    }
}
