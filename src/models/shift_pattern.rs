use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::shift_pattern::{
    NewShiftPattern as DomainNewShiftPattern, ShiftPattern as DomainShiftPattern,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::shift_patterns)]
pub struct ShiftPattern {
    pub id: i32,
    pub hub_id: i32,
    pub code: String,
    pub working_hours: f64,
    pub is_partial: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::shift_patterns)]
pub struct NewShiftPattern<'a> {
    pub hub_id: i32,
    pub code: &'a str,
    pub working_hours: f64,
    pub is_partial: bool,
    pub updated_at: NaiveDateTime,
}

impl From<ShiftPattern> for DomainShiftPattern {
    fn from(value: ShiftPattern) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            code: value.code,
            working_hours: value.working_hours,
            is_partial: value.is_partial,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewShiftPattern> for NewShiftPattern<'a> {
    fn from(value: &'a DomainNewShiftPattern) -> Self {
        Self {
            hub_id: value.hub_id,
            code: value.code.as_str(),
            working_hours: value.working_hours,
            is_partial: value.is_partial,
            updated_at: value.updated_at,
        }
    }
}
