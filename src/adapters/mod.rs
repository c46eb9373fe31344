//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod csv_report_adapter;
pub mod file_config_adapter;
pub mod format;
pub mod html_report_adapter;
pub mod json_history_adapter;
pub mod text_report_adapter;
