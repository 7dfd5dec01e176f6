pub mod dashboard;
pub mod reports;

pub use dashboard::DashboardService;
