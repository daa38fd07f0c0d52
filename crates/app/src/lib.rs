//! # `stockbar-app` - 行情看板终端外壳
//!
//! 负责配置加载、日志初始化、轮询调度与终端渲染。
//! 行情解析与指标推导全部委托给 `stockbar-quote`。

pub mod logging;
pub mod render;
pub mod settings;
