use stockbar_core::config::LogConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// # Summary
/// 初始化全局日志。
///
/// # Logic
/// 1. `RUST_LOG` 优先，其次为配置中的过滤表达式，默认 `info`。
/// 2. 配置了日志目录时按天滚动写文件，否则写到 stderr (stdout 留给行情表格)。
///
/// # Arguments
/// * `config`: 日志配置。
///
/// # Returns
/// 写文件时返回后台写线程的守卫，调用方需持有到进程退出。
pub fn init(config: &LogConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter.as_deref().unwrap_or(DEFAULT_FILTER)));

    match &config.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "stockbar.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}
