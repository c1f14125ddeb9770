use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Code of the pattern that is treated as partial when no explicit flag is given.
pub const PARTIAL_PATTERN_CODE: &str = "partial";

/// Named shift duration with its standard working hours.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShiftPattern {
    /// Unique identifier of the pattern.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Short code selected by operators (for example `8h` or `partial`).
    pub code: String,
    /// Standard working hours of the shift.
    pub working_hours: f64,
    /// Partial shifts compute availability from recorded time only.
    pub is_partial: bool,
    /// Timestamp for when the pattern record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the pattern record.
    pub updated_at: NaiveDateTime,
}

/// Payload used to insert or refresh a shift pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShiftPattern {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Short code selected by operators.
    pub code: String,
    /// Standard working hours of the shift.
    pub working_hours: f64,
    /// Partial shifts compute availability from recorded time only.
    pub is_partial: bool,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewShiftPattern {
    /// Build a pattern payload; the partial flag defaults from the code.
    pub fn new(hub_id: i32, code: impl Into<String>, working_hours: f64) -> Self {
        let code = code.into().trim().to_string();
        let is_partial = code.eq_ignore_ascii_case(PARTIAL_PATTERN_CODE);
        Self {
            hub_id,
            code,
            working_hours,
            is_partial,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    /// Override the partial flag derived from the code.
    pub fn partial(mut self, is_partial: bool) -> Self {
        self.is_partial = is_partial;
        self
    }
}
