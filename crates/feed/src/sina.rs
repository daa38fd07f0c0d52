use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};
use std::time::Duration;
use stockbar_core::config::FeedConfig;
use stockbar_core::quote::error::QuoteError;
use stockbar_core::quote::port::QuoteSource;
use tracing::debug;

const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// # Summary
/// 新浪财经实时行情提供者实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯。
/// - 接口要求带 Referer，否则返回 403。
#[derive(Clone)]
pub struct SinaProvider {
    // 内部使用的 HTTP 客户端
    client: Client,
    // 形如 `https://hq.sinajs.cn/list=` 的请求前缀
    base_url: String,
}

impl SinaProvider {
    /// # Summary
    /// 使用默认配置创建 SinaProvider。
    pub fn new() -> Result<Self, QuoteError> {
        Self::with_config(&FeedConfig::default())
    }

    /// # Summary
    /// 按配置创建 SinaProvider。
    ///
    /// # Logic
    /// 1. 安装 rustls 的 ring 加密后端 (进程内只需一次)。
    /// 2. 设置 Referer 与浏览器 User-Agent。
    /// 3. 按配置设置请求超时并构建客户端。
    ///
    /// # Arguments
    /// * `config`: 数据源配置。
    ///
    /// # Returns
    /// 成功返回 SinaProvider，Header 或客户端构建失败返回 `QuoteError::Config`。
    pub fn with_config(config: &FeedConfig) -> Result<Self, QuoteError> {
        if rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
        {
            debug!("rustls crypto provider already installed");
        }

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));
        headers.insert(
            REFERER,
            HeaderValue::from_str(&config.referer)
                .map_err(|e| QuoteError::Config(format!("invalid referer: {e}")))?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .default_headers(headers)
            .build()
            .map_err(|e| QuoteError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// 拼接批量请求地址。
    pub fn request_url(&self, codes: &[String]) -> String {
        format!("{}{}", self.base_url, codes.join(","))
    }
}

#[async_trait]
impl QuoteSource for SinaProvider {
    /// # Summary
    /// 批量抓取实时行情文本。
    ///
    /// # Logic
    /// 1. 将代码以逗号拼接到 `list=` 之后。
    /// 2. 发起 GET 请求，任何连接或超时错误都归为网络错误。
    /// 3. 非 2xx 状态同样视为网络错误。
    /// 4. 按响应声明的字符集 (GBK/GB18030) 解码为文本。
    ///
    /// # Arguments
    /// * `codes`: 带前缀代码列表。
    ///
    /// # Returns
    /// 成功返回原始响应文本。
    async fn fetch_raw(&self, codes: &[String]) -> Result<String, QuoteError> {
        if codes.is_empty() {
            return Err(QuoteError::NoInstruments);
        }
        let url = self.request_url(codes);
        debug!("GET {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| QuoteError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(QuoteError::Network(format!("HTTP {}", resp.status())));
        }

        resp.text()
            .await
            .map_err(|e| QuoteError::Parse(e.to_string()))
    }
}
