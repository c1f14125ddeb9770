use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Expected production rate of a product on a machine, in the machine's
/// quantity unit per hour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandardRate {
    pub id: i32,
    pub hub_id: i32,
    pub product_id: i32,
    pub machine_id: i32,
    pub standard_rate: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl StandardRate {
    /// A rate can only serve as an efficiency denominator when it is a
    /// positive finite number.
    pub fn is_usable(&self) -> bool {
        self.standard_rate.is_finite() && self.standard_rate > 0.0
    }
}

/// Payload used to insert or refresh a standard rate.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStandardRate {
    pub hub_id: i32,
    pub product_id: i32,
    pub machine_id: i32,
    pub standard_rate: f64,
    pub updated_at: NaiveDateTime,
}

impl NewStandardRate {
    pub fn new(hub_id: i32, product_id: i32, machine_id: i32, standard_rate: f64) -> Self {
        Self {
            hub_id,
            product_id,
            machine_id,
            standard_rate,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }
}
