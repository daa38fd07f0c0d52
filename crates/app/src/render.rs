use stockbar_core::quote::entity::{Column, QuoteBatch, Sign};
use unicode_width::UnicodeWidthStr;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const GREY: &str = "\x1b[90m";
const RESET: &str = "\x1b[0m";

/// 投影后的单元格：文本与可选的着色方向。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedCell {
    pub text: String,
    pub sign: Option<Sign>,
}

/// # Summary
/// 按可见列投影显示批次。
///
/// # Logic
/// 1. 按 `columns` 给定的顺序从规范行中取出单元格。
/// 2. 同时按列取出着色方向，着色层不再解析文本。
///
/// # Arguments
/// * `batch`: 管线输出。
/// * `columns`: 可见列。
///
/// # Returns
/// 与批次行数相同的投影结果。
pub fn project(batch: &QuoteBatch, columns: &[Column]) -> Vec<Vec<ProjectedCell>> {
    batch
        .rows
        .iter()
        .zip(&batch.signs)
        .map(|(row, signs)| {
            columns
                .iter()
                .map(|col| ProjectedCell {
                    text: row
                        .get(col.index())
                        .map(|c| c.text().to_string())
                        .unwrap_or_default(),
                    sign: col.sign_in(signs),
                })
                .collect()
        })
        .collect()
}

fn left_aligned(col: Column) -> bool {
    matches!(col, Column::Code | Column::Name | Column::KLine)
}

fn pad(text: &str, width: usize, left: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(text.width()));
    if left {
        format!("{text}{fill}")
    } else {
        format!("{fill}{text}")
    }
}

fn paint(text: String, sign: Option<Sign>) -> String {
    match sign {
        Some(Sign::Positive) => format!("{RED}{text}{RESET}"),
        Some(Sign::Negative) => format!("{GREEN}{text}{RESET}"),
        Some(Sign::Flat) => format!("{GREY}{text}{RESET}"),
        None => text,
    }
}

/// # Summary
/// 将投影结果渲染为终端文本表格。
///
/// # Logic
/// 1. 按显示宽度 (中文计 2 列) 计算每列宽度。
/// 2. 名称、代码左对齐，其余右对齐。
/// 3. 着色模式下红涨绿跌，持平为灰色。
pub fn render_table(
    batch: &QuoteBatch,
    columns: &[Column],
    header_visible: bool,
    colorful: bool,
) -> String {
    let rows = project(batch, columns);
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let header = if header_visible { col.header().width() } else { 0 };
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.text.width())
                .fold(header, usize::max)
        })
        .collect();

    let mut out = String::new();
    if header_visible {
        let line: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| pad(col.header(), *w, left_aligned(*col)))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    for row in rows {
        let line: Vec<String> = row
            .into_iter()
            .zip(columns.iter().zip(&widths))
            .map(|(cell, (col, w))| {
                let padded = pad(&cell.text, *w, left_aligned(*col));
                if colorful {
                    paint(padded, cell.sign)
                } else {
                    padded
                }
            })
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}
