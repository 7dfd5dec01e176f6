use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use super::{RecordKind, Status};

/// 行项目 (从记录内嵌的 JSON 数组解码而来, 解码后不再变化)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub model: String,
    pub description: String,
    pub qty: BigDecimal,
    pub price: BigDecimal,
}

/// 业务记录 (发票 / 报价单 / 送货单)
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    /// 记录编号, 归一化后全表唯一, 作为合并与状态切换的键
    pub number: String,
    pub kind: RecordKind,
    /// 无法解析的日期记 None, 不参与月份分桶
    pub date: Option<NaiveDate>,
    pub customer_name: String,
    pub items: Vec<LineItem>,
    /// 合并时固化的合计 = Σ qty×price
    pub total: BigDecimal,
    /// 自由文本备注; 仅由状态切换流程改写
    pub notes: String,
    pub status: Status,
}

impl Record {
    /// 记录所属月份 ("YYYY-MM")
    pub fn month(&self) -> Option<String> {
        self.date.map(|d| d.format("%Y-%m").to_string())
    }
}

/// 解码内嵌行项目 JSON; 任何解码失败都降级为空列表, 不向上冒错
pub fn decode_items(raw: &str) -> Vec<LineItem> {
    let values: Vec<Value> = match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(_) => return Vec::new(),
    };
    values
        .iter()
        .map(|v| LineItem {
            model: text_field(v, "model"),
            description: text_field(v, "description"),
            qty: coerce_decimal(v.get("qty")),
            price: coerce_decimal(v.get("price")),
        })
        .collect()
}

/// 行项目合计 Σ qty×price; 空列表合计为 0
pub fn items_total(items: &[LineItem]) -> BigDecimal {
    let mut sum = BigDecimal::zero();
    for item in items {
        sum += &item.qty * &item.price;
    }
    sum
}

fn text_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// 数值强制转换: JSON 数字按其文本精确解析, 数字字符串同理, 其余一律记 0
fn coerce_decimal(value: Option<&Value>) -> BigDecimal {
    match value {
        Some(Value::Number(n)) => {
            BigDecimal::from_str(&n.to_string()).unwrap_or_else(|_| BigDecimal::zero())
        }
        Some(Value::String(s)) => {
            BigDecimal::from_str(s.trim()).unwrap_or_else(|_| BigDecimal::zero())
        }
        _ => BigDecimal::zero(),
    }
}

/// 切换到完成态时同步备注: 已含关键字 (大小写不敏感子串) 则原样保留, 否则以空格连接追加
pub fn append_status_keyword(notes: &str, keyword: &str) -> String {
    let trimmed = notes.trim();
    if trimmed
        .to_ascii_lowercase()
        .contains(&keyword.to_ascii_lowercase())
    {
        return trimmed.to_string();
    }
    if trimmed.is_empty() {
        keyword.to_string()
    } else {
        format!("{trimmed} {keyword}")
    }
}

/// 切换到未完成态时同步备注: 按整词 (大小写不敏感) 移除关键字.
/// 每处移除顺带吞掉一侧相邻空格, 不留下连续空格; 结果整体去首尾空白
pub fn remove_status_keyword(notes: &str, keyword: &str) -> String {
    let bytes = notes.as_bytes();
    let kw = keyword.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if !kw.is_empty() && matches_word_at(bytes, i, kw) {
            i += kw.len();
            if bytes.get(i) == Some(&b' ') {
                i += 1;
            } else if out.last() == Some(&b' ') {
                out.pop();
            }
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&out).trim().to_string()
}

/// 整词匹配: 关键字两侧不能紧邻字母或数字
fn matches_word_at(bytes: &[u8], i: usize, kw: &[u8]) -> bool {
    if i + kw.len() > bytes.len() {
        return false;
    }
    if !bytes[i..i + kw.len()].eq_ignore_ascii_case(kw) {
        return false;
    }
    let before_ok = i == 0 || !bytes[i - 1].is_ascii_alphanumeric();
    let after = i + kw.len();
    let after_ok = after == bytes.len() || !bytes[after].is_ascii_alphanumeric();
    before_ok && after_ok
}
