use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 未配置任何代码时使用的默认标的 (上证指数)。
pub const DEFAULT_CODE: &str = "sh000001";

/// # Summary
/// 证券所在交易所，决定行情代码的前缀。
///
/// # Invariants
/// - 前缀总是两位小写字母 (`sh` / `sz` / `bj`)。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Exchange {
    // 上海证券交易所
    Shanghai,
    // 深圳证券交易所
    Shenzhen,
    // 北京证券交易所
    Beijing,
}

impl Exchange {
    /// 交易所对应的行情代码前缀。
    pub fn prefix(&self) -> &'static str {
        match self {
            Exchange::Shanghai => "sh",
            Exchange::Shenzhen => "sz",
            Exchange::Beijing => "bj",
        }
    }

    /// # Summary
    /// 按 A 股代码段规则推断 6 位裸代码所属交易所。
    ///
    /// # Logic
    /// 1. `6`、`90`、`5` 开头归上交所。
    /// 2. `0`、`1`、`2`、`3` 开头归深交所。
    /// 3. `8`、`4`、`92` 开头归北交所。
    ///
    /// # Arguments
    /// * `digits`: 已确认为 6 位数字的代码。
    ///
    /// # Returns
    /// 无法识别的代码段返回 None。
    pub fn infer(digits: &str) -> Option<Self> {
        let first = digits.chars().next()?;
        match first {
            '6' | '5' => Some(Exchange::Shanghai),
            '0' | '1' | '2' | '3' => Some(Exchange::Shenzhen),
            '8' | '4' => Some(Exchange::Beijing),
            '9' if digits.starts_with("90") => Some(Exchange::Shanghai),
            '9' if digits.starts_with("92") => Some(Exchange::Beijing),
            _ => None,
        }
    }
}

impl FromStr for Exchange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sh" => Ok(Exchange::Shanghai),
            "sz" => Ok(Exchange::Shenzhen),
            "bj" => Ok(Exchange::Beijing),
            _ => Err(format!("Unknown exchange: {}", s)),
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// # Summary
/// 将用户输入的代码规范化为行情接口要求的带前缀形式。
///
/// # Logic
/// 1. 去掉所有非字母数字字符并转为小写。
/// 2. 已带前缀 (`sh|sz|bj` + 数字) 的原样返回。
/// 3. 6 位裸代码按代码段推断交易所并补全前缀。
/// 4. 其余情况 (包括 5 位港股代码) 一律视为无效。
///
/// # Arguments
/// * `input`: 用户输入的原始文本。
///
/// # Returns
/// 规范化后的代码，无法识别时返回 None。对自身输出再次调用结果不变。
pub fn normalize_code(input: &str) -> Option<String> {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    if let Some((prefix, digits)) = cleaned.split_at_checked(2)
        && prefix.parse::<Exchange>().is_ok()
        && !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
    {
        return Some(cleaned);
    }

    if cleaned.len() == 6 && cleaned.chars().all(|c| c.is_ascii_digit()) {
        let exchange = Exchange::infer(&cleaned)?;
        return Some(format!("{}{}", exchange.prefix(), cleaned));
    }

    None
}

/// 去掉代码的交易所前缀，用于界面上的短代码显示。
pub fn strip_exchange_prefix(code: &str) -> &str {
    match code.split_at_checked(2) {
        Some((prefix, rest)) if prefix.parse::<Exchange>().is_ok() && !rest.is_empty() => rest,
        _ => code,
    }
}

/// # Summary
/// 关注列表中的单条编辑项。
///
/// # Invariants
/// - `last_valid` 若存在，必然是 `normalize_code` 的输出。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeEntry {
    // 当前显示文本
    pub text: String,
    // 最近一次规范化成功的值
    pub last_valid: Option<String>,
}

/// # Summary
/// 用户维护的关注列表，负责编辑时的规范化与回退。
///
/// # Invariants
/// - 每次编辑后，列表中每一项要么是合法代码，要么已被移除。
/// - 对已经规范化的列表重复应用规范化是无操作。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeList {
    entries: Vec<CodeEntry>,
}

impl CodeList {
    /// # Summary
    /// 从一组原始输入构造关注列表。
    ///
    /// # Logic
    /// 1. 逐项规范化，无效项直接丢弃 (没有可回退的历史值)。
    /// 2. 按首次出现顺序去重。
    ///
    /// # Arguments
    /// * `inputs`: 原始代码文本序列。
    ///
    /// # Returns
    /// 仅包含合法代码的列表。
    pub fn from_inputs<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::default();
        for input in inputs {
            list.push(input.as_ref());
        }
        list
    }

    /// # Summary
    /// 追加一条新代码。
    ///
    /// # Returns
    /// 无法规范化或与已有项重复时不加入，返回 false。
    pub fn push(&mut self, input: &str) -> bool {
        match normalize_code(input) {
            Some(code) if !self.entries.iter().any(|e| e.text == code) => {
                self.entries.push(CodeEntry {
                    text: code.clone(),
                    last_valid: Some(code),
                });
                true
            }
            _ => false,
        }
    }

    /// # Summary
    /// 应用一次用户编辑。
    ///
    /// # Logic
    /// 1. 新文本可规范化：写回规范化文本并记为最近有效值。
    /// 2. 不可规范化但有历史有效值：回退为历史值。
    /// 3. 两者皆无：移除该项。
    ///
    /// # Arguments
    /// * `index`: 被编辑项的位置。
    /// * `text`: 编辑后的文本。
    ///
    /// # Returns
    /// 该项最终的代码，被移除或越界时返回 None。
    pub fn apply_edit(&mut self, index: usize, text: &str) -> Option<String> {
        let entry = self.entries.get_mut(index)?;
        match normalize_code(text) {
            Some(code) => {
                entry.text = code.clone();
                entry.last_valid = Some(code.clone());
                Some(code)
            }
            None => match entry.last_valid.clone() {
                Some(prev) => {
                    entry.text = prev.clone();
                    Some(prev)
                }
                None => {
                    self.entries.remove(index);
                    None
                }
            },
        }
    }

    /// 按顺序返回去重后的合法代码。
    pub fn codes(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            if let Some(code) = normalize_code(&entry.text)
                && !out.contains(&code)
            {
                out.push(code);
            }
        }
        out
    }

    /// 同 `codes`，但列表为空时回落到默认标的。
    pub fn codes_or_default(&self) -> Vec<String> {
        let codes = self.codes();
        if codes.is_empty() {
            vec![DEFAULT_CODE.to_string()]
        } else {
            codes
        }
    }
}
