use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Domain representation of a product manufactured by a hub.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Human-readable name of the product, unique within the hub.
    pub name: String,
    /// Nominal batch size.
    pub batch_size: f64,
    /// Units packed into one box.
    pub units_per_box: f64,
    /// Primary packaging units packed into one box.
    pub primary_units_per_box: f64,
    /// Optional code of the product in the ERP system.
    pub oracle_code: Option<String>,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert or refresh a product for a hub.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Nominal batch size.
    pub batch_size: f64,
    /// Units packed into one box.
    pub units_per_box: f64,
    /// Primary packaging units packed into one box.
    pub primary_units_per_box: f64,
    /// Optional code of the product in the ERP system.
    pub oracle_code: Option<String>,
    /// Timestamp captured when the product payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewProduct {
    /// Build a new product payload with unit packaging and the current timestamp.
    pub fn new(hub_id: i32, name: impl Into<String>) -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            hub_id,
            name: name.into(),
            batch_size: 1.0,
            units_per_box: 1.0,
            primary_units_per_box: 1.0,
            oracle_code: None,
            updated_at: now,
        }
    }

    /// Set the nominal batch size.
    pub fn with_batch_size(mut self, batch_size: f64) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the packaging counts.
    pub fn with_packaging(mut self, units_per_box: f64, primary_units_per_box: f64) -> Self {
        self.units_per_box = units_per_box;
        self.primary_units_per_box = primary_units_per_box;
        self
    }

    /// Attach an ERP code to the product payload.
    pub fn with_oracle_code(mut self, oracle_code: impl Into<String>) -> Self {
        self.oracle_code = Some(oracle_code.into());
        self
    }
}
