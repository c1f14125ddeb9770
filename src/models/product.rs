use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{NewProduct as DomainNewProduct, Product as DomainProduct};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub batch_size: f64,
    pub units_per_box: f64,
    pub primary_units_per_box: f64,
    pub oracle_code: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct NewProduct<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub batch_size: f64,
    pub units_per_box: f64,
    pub primary_units_per_box: f64,
    pub oracle_code: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<Product> for DomainProduct {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            name: value.name,
            batch_size: value.batch_size,
            units_per_box: value.units_per_box,
            primary_units_per_box: value.primary_units_per_box,
            oracle_code: value.oracle_code,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(value: &'a DomainNewProduct) -> Self {
        Self {
            hub_id: value.hub_id,
            name: value.name.as_str(),
            batch_size: value.batch_size,
            units_per_box: value.units_per_box,
            primary_units_per_box: value.primary_units_per_box,
            oracle_code: value.oracle_code.as_deref(),
            updated_at: value.updated_at,
        }
    }
}
