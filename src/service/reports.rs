use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;
use std::collections::BTreeSet;

use crate::models::{CustomerSummary, LineItem, Record, RecordKind, ReportSummary};

/// 全部记录中出现过的月份 ("YYYY-MM"), 升序去重.
/// 无法解析日期的记录不产生月份
pub fn months(records: &[Record]) -> Vec<String> {
    let set: BTreeSet<String> = records.iter().filter_map(Record::month).collect();
    set.into_iter().collect()
}

/// 汇总报表: 已收款发票合计 / 未收款发票合计 / 未收款发票编号.
/// 月份过滤仅作用于本函数; 无日期的记录不匹配任何月份过滤
pub fn summary(records: &[Record], month: Option<&str>) -> ReportSummary {
    let mut grand_total = BigDecimal::zero();
    let mut pending_total = BigDecimal::zero();
    let mut pending_numbers: Vec<&str> = Vec::new();

    for rec in records {
        if let Some(m) = month {
            if rec.month().as_deref() != Some(m) {
                continue;
            }
        }
        if rec.kind != RecordKind::Invoice {
            continue;
        }
        if rec.status.is_complete() {
            grand_total += &rec.total;
        } else {
            pending_total += &rec.total;
            pending_numbers.push(&rec.number);
        }
    }

    let pending_numbers = if pending_numbers.is_empty() {
        "None".to_string()
    } else {
        pending_numbers.join(", ")
    };

    ReportSummary { grand_total, pending_total, pending_numbers }
}

/// 月度销售: 对每个出现过的月份统计该月已收款发票合计.
/// 始终基于全量记录计算 (月份枚举覆盖全集), 与当前过滤无关
pub fn monthly_sales(records: &[Record]) -> IndexMap<String, BigDecimal> {
    let mut sales: IndexMap<String, BigDecimal> = IndexMap::new();
    for m in months(records) {
        sales.insert(m, BigDecimal::zero());
    }
    for rec in records {
        if rec.kind != RecordKind::Invoice || !rec.status.is_complete() {
            continue;
        }
        if let Some(m) = rec.month() {
            if let Some(slot) = sales.get_mut(&m) {
                *slot += &rec.total;
            }
        }
    }
    sales
}

/// 客户维度汇总: 发票计订单数, 报价单计报价数, 已收款金额累加.
/// 客户名缺失归入 "Unknown"; 分桶保持首次出现顺序
pub fn customer_summary(records: &[Record]) -> IndexMap<String, CustomerSummary> {
    let mut buyers: IndexMap<String, CustomerSummary> = IndexMap::new();
    for rec in records {
        let name = if rec.customer_name.trim().is_empty() {
            "Unknown"
        } else {
            rec.customer_name.as_str()
        };
        let entry = buyers.entry(name.to_string()).or_default();
        match rec.kind {
            RecordKind::Invoice => {
                entry.orders += 1;
                if rec.status.is_complete() {
                    entry.paid += &rec.total;
                }
            }
            RecordKind::Quotation => entry.quotations += 1,
            RecordKind::Delivery => {}
        }
    }
    buyers
}

/// 导出当前记录列表为 CSV (文件下载用)
pub fn records_to_csv(records: &[Record]) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    use csv::Writer;

    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(["number", "type", "date", "customer", "items", "total", "notes", "status"])?;
    for rec in records {
        writer.write_record(&[
            rec.number.clone(),
            rec.kind.to_string(),
            rec.date.map(|d| d.to_string()).unwrap_or_default(),
            rec.customer_name.clone(),
            items_column(&rec.items),
            rec.total.to_string(),
            rec.notes.clone(),
            rec.status.to_string(),
        ])?;
    }

    let body = writer.into_inner()?;
    Ok(String::from_utf8(body)?)
}

/// 行项目的单列压缩表示
fn items_column(items: &[LineItem]) -> String {
    items
        .iter()
        .map(|it| format!("{} - {} x{} @ {}", it.model, it.description, it.qty, it.price))
        .collect::<Vec<_>>()
        .join("; ")
}
