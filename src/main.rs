use axum::{
    routing::{get, post},
    Router,
};
use invoice_dash_rust::{api, sheet, AppConfig, DashboardService, OverrideStore};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tracing::{info, warn};
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::from_env();
    info!("Starting server with config: {:?}", config);

    // 一次性加载工作簿; 失败降级为空记录集 + 警告, 不阻塞启动
    let (records, warning) =
        match sheet::load_records(&config.source.location, &config.source.sheet).await {
            Ok(records) => {
                info!("Loaded {} records from {}", records.len(), config.source.location);
                (records, None)
            }
            Err(e) => {
                warn!("Failed to load sheet data: {}", e);
                (
                    Vec::new(),
                    Some(format!(
                        "Failed to load sheet data: {e}. Dashboard will show with empty data."
                    )),
                )
            }
        };

    // 构建仪表盘服务 (合并本地覆盖并排序)
    let store = OverrideStore::new(config.store.path.clone());
    let dashboard = Arc::new(RwLock::new(DashboardService::new(records, warning, store)));

    // 构建路由
    let app = Router::new()
        .route("/health", get(api::health_check))
        .route("/api/records", get(api::list_records))
        .route("/api/records/toggle", post(api::toggle_status))
        .route("/api/records/export", get(api::export_csv))
        .route("/api/reports", get(api::get_reports))
        .with_state(dashboard)
        .layer(ServiceBuilder::new());

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET  /api/records         - merged record list");
    info!("  POST /api/records/toggle  - toggle completion status");
    info!("  GET  /api/reports         - aggregate reports (?month=YYYY-MM)");
    info!("  GET  /api/records/export  - CSV download");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
