use config::{Config, Environment, File, FileFormat};
use stockbar_core::config::AppConfig;
use stockbar_core::quote::error::QuoteError;

/// 默认配置文件名 (不含扩展名，按 toml/yaml/json 依次探测)。
pub const DEFAULT_CONFIG_NAME: &str = "stockbar";

/// 环境变量前缀，例如 `STOCKBAR__REFRESH_SECONDS=5`。
pub const ENV_PREFIX: &str = "STOCKBAR";

/// # Summary
/// 加载应用配置。
///
/// # Logic
/// 1. 指定路径时该文件必须存在；未指定时尝试可选的 `stockbar.*`。
/// 2. 叠加 `STOCKBAR__` 前缀的环境变量，`codes` 支持逗号分隔。
/// 3. 反序列化后统一规整 (代码规范化、刷新间隔夹取)。
///
/// # Arguments
/// * `path`: 可选的配置文件路径。
///
/// # Returns
/// 成功返回规整后的配置，失败返回 `QuoteError::Config`。
pub fn load(path: Option<&str>) -> Result<AppConfig, QuoteError> {
    load_with(path, environment())
}

/// # Summary
/// 环境变量配置源。
///
/// # Logic
/// 值一律保留为字符串，由反序列化按目标类型解析。
/// 若提前按数字解析，`000001` 这类裸代码会丢失前导零。
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__")
}

/// 按给定的环境变量源加载配置，其余规则同 [`load`]。
pub fn load_with(path: Option<&str>, env: Environment) -> Result<AppConfig, QuoteError> {
    let file = match path {
        Some(p) => File::with_name(p).required(true),
        None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let settings = Config::builder()
        .add_source(file)
        .add_source(env)
        .build()
        .map_err(|e| QuoteError::Config(e.to_string()))?;

    deserialize(settings)
}

/// 从内存中的 TOML 文本加载配置，不读取环境变量。
pub fn from_toml_str(text: &str) -> Result<AppConfig, QuoteError> {
    let settings = Config::builder()
        .add_source(File::from_str(text, FileFormat::Toml))
        .build()
        .map_err(|e| QuoteError::Config(e.to_string()))?;
    deserialize(settings)
}

fn deserialize(settings: Config) -> Result<AppConfig, QuoteError> {
    settings
        .try_deserialize::<AppConfig>()
        .map(AppConfig::normalized)
        .map_err(|e| QuoteError::Config(e.to_string()))
}
