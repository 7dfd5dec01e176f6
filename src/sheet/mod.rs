pub mod fetch;
pub mod parse;

pub use fetch::{fetch_workbook, SheetError};
pub use parse::records_from_workbook;

use crate::models::Record;

/// 一次性加载: 下载 (或读取) 工作簿并解析指定工作表
pub async fn load_records(source: &str, sheet: &str) -> Result<Vec<Record>, SheetError> {
    let bytes = fetch_workbook(source).await?;
    records_from_workbook(&bytes, sheet)
}
