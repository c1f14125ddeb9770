use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::machine::{Machine as DomainMachine, NewMachine as DomainNewMachine};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::machines)]
pub struct Machine {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub qty_uom: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::machines)]
pub struct NewMachine<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub qty_uom: &'a str,
    pub updated_at: NaiveDateTime,
}

impl From<Machine> for DomainMachine {
    fn from(value: Machine) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            name: value.name,
            qty_uom: value.qty_uom,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewMachine> for NewMachine<'a> {
    fn from(value: &'a DomainNewMachine) -> Self {
        Self {
            hub_id: value.hub_id,
            name: value.name.as_str(),
            qty_uom: value.qty_uom.as_str(),
            updated_at: value.updated_at,
        }
    }
}
