pub mod domain;
pub mod forms;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

/// Role required to enter, save and delete shift reports.
pub const SERVICE_ACCESS_ROLE: &str = "shifts";
/// Role that may only browse the dashboard and saved reports.
pub const REPORTS_ACCESS_ROLE: &str = "shifts_reports";
/// Role required to import reference data.
pub const ADMIN_ACCESS_ROLE: &str = "shifts_admin";
