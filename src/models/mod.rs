pub mod machine;
pub mod product;
pub mod shift_pattern;
pub mod shift_report;
pub mod standard_rate;
