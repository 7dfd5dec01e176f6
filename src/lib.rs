pub mod api;
pub mod config;
pub mod models;
pub mod service;
pub mod sheet;
pub mod store;

pub use config::AppConfig;
pub use service::DashboardService;
pub use store::OverrideStore;
