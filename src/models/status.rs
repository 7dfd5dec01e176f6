use serde::{Deserialize, Serialize};
use std::fmt;

/// 记录类型 (封闭枚举: 发票 / 报价单 / 送货单)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Invoice,
    Quotation,
    Delivery,
}

impl RecordKind {
    /// 从表格中的类型文本解析 (大小写不敏感; 非 invoice/quotation 一律归入送货单族)
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "invoice" => Self::Invoice,
            "quotation" => Self::Quotation,
            _ => Self::Delivery,
        }
    }

    /// 该类型完成态在备注中的关键字 (未完成态没有独立关键字, 以缺席表示)
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Invoice => "Paid",
            Self::Quotation => "Accepted",
            Self::Delivery => "Delivered",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Invoice => "Invoice",
            Self::Quotation => "Quotation",
            Self::Delivery => "Delivery",
        };
        f.write_str(label)
    }
}

/// 完成状态: 按记录类型分族, 每族二元 (未完成/完成)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Unpaid,
    Paid,
    Unaccepted,
    Accepted,
    Pending,
    Delivered,
}

impl Status {
    /// 本族的未完成态
    pub fn incomplete(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Invoice => Self::Unpaid,
            RecordKind::Quotation => Self::Unaccepted,
            RecordKind::Delivery => Self::Pending,
        }
    }

    /// 本族的完成态
    pub fn complete(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Invoice => Self::Paid,
            RecordKind::Quotation => Self::Accepted,
            RecordKind::Delivery => Self::Delivered,
        }
    }

    pub fn is_complete(self) -> bool {
        matches!(self, Self::Paid | Self::Accepted | Self::Delivered)
    }

    /// 依据备注文本推导初始状态 (仅用于没有本地覆盖的记录).
    /// 大小写不敏感的子串检查: 备注含本族关键字即视为完成态
    pub fn derive(kind: RecordKind, notes: &str) -> Self {
        let haystack = notes.to_ascii_lowercase();
        if haystack.contains(&kind.keyword().to_ascii_lowercase()) {
            Self::complete(kind)
        } else {
            Self::incomplete(kind)
        }
    }

    /// 在本族内翻转 (完成 <-> 未完成, 二元循环)
    pub fn toggled(self, kind: RecordKind) -> Self {
        if self.is_complete() {
            Self::incomplete(kind)
        } else {
            Self::complete(kind)
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Unpaid => "Unpaid",
            Self::Paid => "Paid",
            Self::Unaccepted => "Unaccepted",
            Self::Accepted => "Accepted",
            Self::Pending => "Pending",
            Self::Delivered => "Delivered",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
