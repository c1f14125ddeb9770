use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Production machine owned by a hub.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Machine {
    /// Unique identifier of the machine.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Human-readable machine name, unique within the hub.
    pub name: String,
    /// Unit in which the machine's output quantity is entered.
    pub qty_uom: String,
    /// Timestamp for when the machine record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the machine record.
    pub updated_at: NaiveDateTime,
}

/// Payload used to insert or refresh a machine for a hub.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMachine {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Human-readable machine name.
    pub name: String,
    /// Unit in which the machine's output quantity is entered.
    pub qty_uom: String,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewMachine {
    /// Build a machine payload with trimmed values and the current timestamp.
    pub fn new(hub_id: i32, name: impl Into<String>, qty_uom: impl Into<String>) -> Self {
        Self {
            hub_id,
            name: name.into().trim().to_string(),
            qty_uom: qty_uom.into().trim().to_string(),
            updated_at: chrono::Local::now().naive_utc(),
        }
    }
}
