//! # `stockbar-feed` - 新浪行情数据源
//!
//! 提供 `QuoteSource` 的新浪 HTTP 实现。

pub mod sina;
