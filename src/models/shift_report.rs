use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::shift::UnknownCode;
use crate::domain::shift_report::{
    NewShiftActivity as DomainNewShiftActivity, NewShiftSummary as DomainNewShiftSummary,
    ShiftActivity as DomainShiftActivity, ShiftSummary as DomainShiftSummary,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::shift_summaries)]
pub struct ShiftSummary {
    pub id: i32,
    pub hub_id: i32,
    pub report_date: NaiveDate,
    pub machine_id: i32,
    pub shift: String,
    pub shift_pattern: String,
    pub standard_hours: f64,
    pub production_hours: f64,
    pub downtime_hours: f64,
    pub availability: f64,
    pub average_efficiency: f64,
    pub oee: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::shift_summaries)]
pub struct NewShiftSummary<'a> {
    pub hub_id: i32,
    pub report_date: NaiveDate,
    pub machine_id: i32,
    pub shift: &'a str,
    pub shift_pattern: &'a str,
    pub standard_hours: f64,
    pub production_hours: f64,
    pub downtime_hours: f64,
    pub availability: f64,
    pub average_efficiency: f64,
    pub oee: f64,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::shift_activities)]
pub struct ShiftActivity {
    pub id: i32,
    pub summary_id: i32,
    pub hub_id: i32,
    pub report_date: NaiveDate,
    pub machine_id: i32,
    pub shift: String,
    pub activity: String,
    pub hours: f64,
    pub product_id: Option<i32>,
    pub batch_number: Option<String>,
    pub quantity: Option<f64>,
    pub comment: Option<String>,
    pub rate: Option<f64>,
    pub standard_rate: Option<f64>,
    pub efficiency: Option<f64>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::shift_activities)]
pub struct NewShiftActivity {
    pub summary_id: i32,
    pub hub_id: i32,
    pub report_date: NaiveDate,
    pub machine_id: i32,
    pub shift: String,
    pub activity: String,
    pub hours: f64,
    pub product_id: Option<i32>,
    pub batch_number: Option<String>,
    pub quantity: Option<f64>,
    pub comment: Option<String>,
    pub rate: Option<f64>,
    pub standard_rate: Option<f64>,
    pub efficiency: Option<f64>,
}

impl TryFrom<ShiftSummary> for DomainShiftSummary {
    type Error = UnknownCode;

    fn try_from(value: ShiftSummary) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            hub_id: value.hub_id,
            report_date: value.report_date,
            machine_id: value.machine_id,
            shift: value.shift.parse()?,
            shift_pattern: value.shift_pattern,
            standard_hours: value.standard_hours,
            production_hours: value.production_hours,
            downtime_hours: value.downtime_hours,
            availability: value.availability,
            average_efficiency: value.average_efficiency,
            oee: value.oee,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl TryFrom<ShiftActivity> for DomainShiftActivity {
    type Error = UnknownCode;

    fn try_from(value: ShiftActivity) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            summary_id: value.summary_id,
            hub_id: value.hub_id,
            report_date: value.report_date,
            machine_id: value.machine_id,
            shift: value.shift.parse()?,
            activity: value.activity.parse()?,
            hours: value.hours,
            product_id: value.product_id,
            batch_number: value.batch_number,
            quantity: value.quantity,
            comment: value.comment,
            rate: value.rate,
            standard_rate: value.standard_rate,
            efficiency: value.efficiency,
            created_at: value.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewShiftSummary> for NewShiftSummary<'a> {
    fn from(value: &'a DomainNewShiftSummary) -> Self {
        let performance = &value.performance;
        Self {
            hub_id: value.key.hub_id,
            report_date: value.key.report_date,
            machine_id: value.key.machine_id,
            shift: value.key.shift.as_str(),
            shift_pattern: value.shift_pattern.as_str(),
            standard_hours: performance.standard_hours,
            production_hours: performance.production_hours,
            downtime_hours: performance.downtime_hours,
            availability: performance.availability,
            average_efficiency: performance.average_efficiency,
            oee: performance.oee,
            updated_at: value.updated_at,
        }
    }
}

impl NewShiftActivity {
    /// Attach an activity to the summary row it was saved with.
    pub fn for_summary(summary: &ShiftSummary, value: &DomainNewShiftActivity) -> Self {
        Self {
            summary_id: summary.id,
            hub_id: summary.hub_id,
            report_date: summary.report_date,
            machine_id: summary.machine_id,
            shift: summary.shift.clone(),
            activity: value.activity.code(),
            hours: value.hours,
            product_id: value.product_id,
            batch_number: value.batch_number.clone(),
            quantity: value.quantity,
            comment: value.comment.clone(),
            rate: value.rate,
            standard_rate: value.standard_rate,
            efficiency: value.efficiency,
        }
    }
}
