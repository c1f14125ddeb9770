pub mod machine;
pub mod performance;
pub mod product;
pub mod report;
pub mod shift;
pub mod shift_pattern;
pub mod shift_report;
pub mod standard_rate;
