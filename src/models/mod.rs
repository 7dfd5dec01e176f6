pub mod record;
pub mod report;
pub mod status;

pub use record::{
    append_status_keyword, decode_items, items_total, remove_status_keyword, LineItem, Record,
};
pub use report::{CustomerSummary, ReportSummary};
pub use status::{RecordKind, Status};
