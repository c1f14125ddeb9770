pub mod api;
pub mod main;
pub mod reference;
pub mod shift_reports;
