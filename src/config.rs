use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub source: SourceConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 工作簿数据源: http(s) 地址或本地路径 + 工作表名
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub location: String,
    pub sheet: String,
}

/// 覆盖存储槽位 (单一 JSON 文件)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            source: SourceConfig {
                location: std::env::var("SHEET_URL")
                    .unwrap_or_else(|_| "records.xlsx".to_string()),
                sheet: "Records".to_string(),
            },
            store: StoreConfig {
                path: "dashboard-overrides.json".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            source: SourceConfig {
                location: std::env::var("SHEET_URL")
                    .unwrap_or_else(|_| "records.xlsx".to_string()),
                sheet: std::env::var("SHEET_NAME").unwrap_or_else(|_| "Records".to_string()),
            },
            store: StoreConfig {
                path: std::env::var("OVERRIDES_PATH")
                    .unwrap_or_else(|_| "dashboard-overrides.json".to_string()),
            },
        }
    }
}
