pub mod config;
pub mod dashboard;
pub mod history;
pub mod progress;
pub mod records;
pub mod session;
pub mod template;
