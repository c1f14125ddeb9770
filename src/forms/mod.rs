pub mod reference;
pub mod shift_reports;
