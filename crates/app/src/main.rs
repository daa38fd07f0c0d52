use std::sync::Arc;
use std::time::Duration;

use stockbar_app::{logging, render, settings};
use stockbar_feed::sina::SinaProvider;
use stockbar_quote::pipeline::QuotePipeline;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// # Summary
/// 应用启动入口。
///
/// # Logic
/// 1. 加载配置 (命令行第一个参数为可选的配置文件路径)。
/// 2. 初始化全局日志。
/// 3. 实例化新浪数据源并注入管线。
/// 4. 按刷新间隔轮询，每轮输出一张行情表；单轮失败只提示，不退出。
/// 5. 收到 Ctrl-C 后退出。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 加载配置
    let path = std::env::args().nth(1);
    let config = settings::load(path.as_deref())?;

    // 2. 初始化日志
    let _log_guard = logging::init(&config.log);
    info!(
        "Stockbar starting: {} codes, refresh every {}s",
        config.codes.len(),
        config.refresh_seconds
    );

    // 3. 实例化数据源与管线
    let source = Arc::new(SinaProvider::with_config(&config.feed)?);
    let pipeline = QuotePipeline::new(source);

    // 4. 轮询，慢请求导致的错过节拍直接跳过
    let mut ticker = tokio::time::interval(Duration::from_secs(config.refresh_seconds));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match pipeline.refresh(&config.codes, &config.display).await {
                    Ok(batch) => {
                        print!(
                            "{}",
                            render::render_table(
                                &batch,
                                &config.columns,
                                config.header_visible,
                                config.colorful,
                            )
                        );
                        println!();
                    }
                    Err(e) => {
                        // 断网只告警
                        if e.is_network() {
                            warn!("Refresh failed: {}", e);
                        } else {
                            error!("Refresh failed: {}", e);
                        }
                        println!("错误: {}", e.user_message());
                    }
                }
            }
            res = &mut shutdown => {
                res?;
                break;
            }
        }
    }

    // 5. 退出
    info!("Shutdown signal received. Exiting...");
    Ok(())
}
