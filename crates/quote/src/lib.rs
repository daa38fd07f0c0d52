//! # `stockbar-quote` - 行情指标推导与显示行组装
//!
//! - `parser`: 新浪响应文本到原始记录的逐行拆分。
//! - `derive`: 由原始记录推导涨跌、委比、均价、竞价、盘口标签与封单。
//! - `format`: 按品种精度组装规范列序的显示行。
//! - `pipeline`: 组合数据源与上述步骤的管线驱动器。

pub mod derive;
pub mod format;
pub mod parser;
pub mod pipeline;
