use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::standard_rate::{
    NewStandardRate as DomainNewStandardRate, StandardRate as DomainStandardRate,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::standard_rates)]
pub struct StandardRate {
    pub id: i32,
    pub hub_id: i32,
    pub product_id: i32,
    pub machine_id: i32,
    pub standard_rate: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::standard_rates)]
pub struct NewStandardRate {
    pub hub_id: i32,
    pub product_id: i32,
    pub machine_id: i32,
    pub standard_rate: f64,
    pub updated_at: NaiveDateTime,
}

impl From<StandardRate> for DomainStandardRate {
    fn from(value: StandardRate) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            product_id: value.product_id,
            machine_id: value.machine_id,
            standard_rate: value.standard_rate,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<&DomainNewStandardRate> for NewStandardRate {
    fn from(value: &DomainNewStandardRate) -> Self {
        Self {
            hub_id: value.hub_id,
            product_id: value.product_id,
            machine_id: value.machine_id,
            standard_rate: value.standard_rate,
            updated_at: value.updated_at,
        }
    }
}
