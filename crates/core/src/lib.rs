//! # `stockbar-core` - 行情看板领域核心
//!
//! 定义行情看板的实体、错误、端口 (Port) 与配置结构。
//! 本 crate 不做任何网络 IO，具体数据源由 `stockbar-feed` 实现，
//! 指标推导与行格式化由 `stockbar-quote` 实现。

pub mod common;
pub mod config;
pub mod quote;
