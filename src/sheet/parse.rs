use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use chrono::{Duration, NaiveDate};
use indexmap::IndexSet;
use rayon::prelude::*;

use super::fetch::SheetError;
use crate::models::{decode_items, items_total, Record, RecordKind, Status};

/// 从工作簿字节中解析指定工作表, 归一化为记录列表.
/// 表头行小写并去除空白后按位置与数据行对齐; 编号重复的行只保留首次出现
pub fn records_from_workbook(bytes: &[u8], sheet: &str) -> Result<Vec<Record>, SheetError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    if !workbook.sheet_names().iter().any(|n| n == sheet) {
        return Err(SheetError::MissingSheet(sheet.to_string()));
    }
    let range = workbook.worksheet_range(sheet)?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|c| normalize_header(&cell_text(c)))
        .collect();

    let data_rows: Vec<&[Data]> = rows
        .filter(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .collect();

    // 行与行之间互不依赖, 批量整形并行处理
    let parsed: Vec<Record> = data_rows
        .par_iter()
        .map(|row| record_from_row(&headers, row))
        .collect();

    Ok(dedupe_by_number(parsed))
}

/// 表头归一化: 去掉所有空白并转小写 ("Customer Name" -> "customername")
fn normalize_header(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// 单行 -> 记录: 缺失的尾部单元格一律按空串处理, 初始状态按备注推导
fn record_from_row(headers: &[String], row: &[Data]) -> Record {
    let text = |name: &str| cell(headers, row, name).map(cell_text).unwrap_or_default();

    let number = text("number");
    let kind = RecordKind::parse(&text("type"));
    let notes = text("notes");
    let items = decode_items(&text("items"));
    let total = items_total(&items);
    let status = Status::derive(kind, &notes);

    Record {
        number,
        kind,
        date: cell(headers, row, "date").and_then(cell_date),
        customer_name: text("customername"),
        items,
        total,
        notes,
        status,
    }
}

fn cell<'a>(headers: &[String], row: &'a [Data], name: &str) -> Option<&'a Data> {
    headers.iter().position(|h| h == name).and_then(|i| row.get(i))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => float_text(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => float_text(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
    }
}

/// 整数值浮点不带小数位输出 (编号列经常被 Excel 存成浮点)
fn float_text(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// 单元格日期: Excel 序列数或日期文本
fn cell_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(dt) => serial_to_date(dt.as_f64()),
        Data::Float(f) => serial_to_date(*f),
        Data::Int(i) => serial_to_date(*i as f64),
        Data::String(s) | Data::DateTimeIso(s) => parse_date_text(s),
        _ => None,
    }
}

/// Excel 序列日期纪元为 1899-12-30 (含 1900 闰年兼容偏移)
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(0.0..600_000.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}

fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d %b %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    // ISO 带时间部分: 截取日期前缀
    if let Some(prefix) = s.get(..10) {
        if let Ok(d) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Some(d);
        }
    }
    None
}

/// 记录编号唯一性: 重复编号保留首次出现的行
fn dedupe_by_number(parsed: Vec<Record>) -> Vec<Record> {
    let mut seen: IndexSet<String> = IndexSet::with_capacity(parsed.len());
    let mut records = Vec::with_capacity(parsed.len());
    for rec in parsed {
        if seen.insert(rec.number.clone()) {
            records.push(rec);
        } else {
            tracing::warn!("Duplicate record number {}, keeping first occurrence", rec.number);
        }
    }
    records
}
