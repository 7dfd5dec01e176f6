use crate::models::{CustomerSummary, Record, ReportSummary};
use crate::service::{reports, DashboardService};
use axum::{
    extract::{Json, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// 共享状态: 仪表盘服务 (单写者, 读写锁保护)
pub type SharedDashboard = Arc<RwLock<DashboardService>>;

/// 记录列表响应 (含加载降级警告)
#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub warning: Option<String>,
    pub records: Vec<Record>,
}

/// 状态切换请求体
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub number: String,
}

/// 状态切换响应体
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub toggled: bool,
    pub message: String,
}

/// 报表查询参数
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub month: Option<String>,
}

/// 报表响应体
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub months: Vec<String>,
    pub summary: ReportSummary,
    pub monthly_sales: IndexMap<String, BigDecimal>,
    pub customers: IndexMap<String, CustomerSummary>,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 当前有序记录列表 (覆盖已合并, 未完成态在前)
pub async fn list_records(State(dashboard): State<SharedDashboard>) -> Json<RecordsResponse> {
    let guard = dashboard.read().await;
    Json(RecordsResponse {
        warning: guard.warning().map(str::to_string),
        records: guard.records().to_vec(),
    })
}

/// 状态切换接口: 未知编号按无操作处理, 始终 200
pub async fn toggle_status(
    State(dashboard): State<SharedDashboard>,
    Json(req): Json<ToggleRequest>,
) -> Json<ToggleResponse> {
    let mut guard = dashboard.write().await;
    let toggled = guard.toggle_status(&req.number);
    let message = if toggled {
        format!("Record {} toggled", req.number)
    } else {
        format!("Record {} not found, ignored", req.number)
    };
    Json(ToggleResponse { toggled, message })
}

/// 报表接口: 可选月份过滤 (汇总部分); 月度销售始终基于全量记录
pub async fn get_reports(
    State(dashboard): State<SharedDashboard>,
    Query(query): Query<ReportQuery>,
) -> Json<ReportResponse> {
    let guard = dashboard.read().await;
    let records = guard.records();
    let month = query.month.as_deref().filter(|m| !m.is_empty());
    Json(ReportResponse {
        months: reports::months(records),
        summary: reports::summary(records, month),
        monthly_sales: reports::monthly_sales(records),
        customers: reports::customer_summary(records),
    })
}

/// 导出当前记录列表为 CSV 下载
pub async fn export_csv(State(dashboard): State<SharedDashboard>) -> Response {
    let guard = dashboard.read().await;
    match reports::records_to_csv(guard.records()) {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"records.csv\""),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("CSV export failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {e}")).into_response()
        }
    }
}
