use bigdecimal::BigDecimal;
use serde::Serialize;

/// 汇总报表 (可按月份过滤)
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    /// 已收款发票合计
    pub grand_total: BigDecimal,
    /// 未收款发票合计
    pub pending_total: BigDecimal,
    /// 未收款发票编号, 逗号连接; 无未收款时为字面量 "None"
    pub pending_numbers: String,
}

/// 客户维度汇总: 发票计订单, 报价单计报价, 已收款金额累加
#[derive(Debug, Clone, Default, Serialize)]
pub struct CustomerSummary {
    pub orders: usize,
    pub quotations: usize,
    pub paid: BigDecimal,
}
