use std::path::Path;
use thiserror::Error;

/// 工作簿加载错误: 调用侧统一降级为空记录集 + 前端警告, 不中断启动
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("download failed: {0}")]
    Download(#[from] reqwest::Error),
    #[error("read failed: {0}")]
    Read(#[from] std::io::Error),
    #[error("workbook parse failed: {0}")]
    Workbook(#[from] calamine::XlsxError),
    #[error("worksheet '{0}' not found")]
    MissingSheet(String),
}

/// 获取工作簿原始字节: http(s) 源走网络下载, 其余按本地路径读取.
/// 一次性操作, 无重试无超时; 失败对本会话即为终态
pub async fn fetch_workbook(source: &str) -> Result<Vec<u8>, SheetError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let resp = reqwest::get(source).await?.error_for_status()?;
        Ok(resp.bytes().await?.to_vec())
    } else {
        Ok(tokio::fs::read(Path::new(source)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_path_read_missing_file_errors() {
        let err = fetch_workbook("/nonexistent/records.xlsx").await.unwrap_err();
        assert!(matches!(err, SheetError::Read(_)));
    }

    #[tokio::test]
    async fn local_path_read_returns_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        std::fs::write(&path, b"stub").unwrap();
        let bytes = fetch_workbook(path.to_str().unwrap()).await.unwrap();
        assert_eq!(bytes, b"stub");
    }
}
