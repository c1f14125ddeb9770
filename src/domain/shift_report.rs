use chrono::{NaiveDate, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

use crate::domain::performance::{
    BatchEntry, DowntimeEntry, MissingStandardRates, RatedBatch, ShiftIssue, ShiftPerformance,
    rate_batches,
};
use crate::domain::shift::{ActivityKind, ShiftType};
use crate::domain::shift_pattern::ShiftPattern;

/// Identifies the single report allowed per hub, date, machine and shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShiftReportKey {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Production date of the shift.
    pub report_date: NaiveDate,
    /// Machine the report belongs to.
    pub machine_id: i32,
    /// Day, night or plan shift.
    pub shift: ShiftType,
}

/// Saved per-shift figures of a machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShiftSummary {
    /// Unique identifier of the summary.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Production date of the shift.
    pub report_date: NaiveDate,
    /// Machine the summary belongs to.
    pub machine_id: i32,
    /// Day, night or plan shift.
    pub shift: ShiftType,
    /// Code of the shift pattern the report was measured against.
    pub shift_pattern: String,
    /// Standard working hours of the pattern at the time of saving.
    pub standard_hours: f64,
    /// Hours spent producing across all batches.
    pub production_hours: f64,
    /// Hours of recorded downtime.
    pub downtime_hours: f64,
    /// Share of the shift spent producing.
    pub availability: f64,
    /// Mean efficiency over all batches.
    pub average_efficiency: f64,
    /// Overall equipment effectiveness.
    pub oee: f64,
    /// Timestamp for when the summary was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the summary.
    pub updated_at: NaiveDateTime,
}

/// One downtime event or production batch of a saved shift.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShiftActivity {
    pub id: i32,
    pub summary_id: i32,
    pub hub_id: i32,
    pub report_date: NaiveDate,
    pub machine_id: i32,
    pub shift: ShiftType,
    pub activity: ActivityKind,
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

/// A saved summary together with its activities.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ShiftReport {
    pub summary: ShiftSummary,
    pub activities: Vec<ShiftActivity>,
}

/// Summary row to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShiftSummary {
    pub key: ShiftReportKey,
    pub shift_pattern: String,
    pub performance: ShiftPerformance,
    pub updated_at: NaiveDateTime,
}

/// Activity row to be inserted; the summary reference and the key columns
/// are filled in from the summary it is saved with.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShiftActivity {
    pub activity: ActivityKind,
    pub hours: f64,
    pub product_id: Option<i32>,
    pub batch_number: Option<String>,
    pub quantity: Option<f64>,
    pub comment: Option<String>,
    pub rate: Option<f64>,
    pub standard_rate: Option<f64>,
    pub efficiency: Option<f64>,
}

impl From<&DowntimeEntry> for NewShiftActivity {
    fn from(entry: &DowntimeEntry) -> Self {
        Self {
            activity: ActivityKind::Downtime(entry.kind),
            hours: entry.hours,
            product_id: None,
            batch_number: None,
            quantity: None,
            comment: entry.comment.clone(),
            rate: None,
            standard_rate: None,
            efficiency: None,
        }
    }
}

impl From<&RatedBatch> for NewShiftActivity {
    fn from(rated: &RatedBatch) -> Self {
        Self {
            activity: ActivityKind::Production,
            hours: rated.batch.hours,
            product_id: Some(rated.batch.product_id),
            batch_number: Some(rated.batch.batch_number.clone()),
            quantity: Some(rated.batch.quantity),
            comment: None,
            rate: Some(rated.rate),
            standard_rate: Some(rated.standard_rate),
            efficiency: Some(rated.efficiency),
        }
    }
}

/// Summary plus activities written together in one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShiftReport {
    pub summary: NewShiftSummary,
    pub activities: Vec<NewShiftActivity>,
}

/// Operator input for one shift before standard rates are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftReportDraft {
    pub key: ShiftReportKey,
    pub shift_pattern_id: i32,
    pub downtime: Vec<DowntimeEntry>,
    pub batches: Vec<BatchEntry>,
}

/// A draft with standard rates applied and performance computed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EvaluatedShiftReport {
    pub key: ShiftReportKey,
    pub pattern: ShiftPattern,
    pub downtime: Vec<DowntimeEntry>,
    pub batches: Vec<RatedBatch>,
    pub performance: ShiftPerformance,
}

impl EvaluatedShiftReport {
    /// Rate every batch and compute the shift figures. Fails without
    /// producing anything when a standard rate is unusable.
    pub fn evaluate<F>(
        draft: ShiftReportDraft,
        pattern: ShiftPattern,
        standard_rate: F,
    ) -> Result<Self, MissingStandardRates>
    where
        F: FnMut(i32) -> Option<f64>,
    {
        let ShiftReportDraft {
            key,
            downtime,
            batches,
            ..
        } = draft;

        let batches = rate_batches(batches, standard_rate)?;
        let performance = ShiftPerformance::evaluate(
            &batches,
            &downtime,
            pattern.working_hours,
            pattern.is_partial,
        );

        Ok(Self {
            key,
            pattern,
            downtime,
            batches,
            performance,
        })
    }

    pub fn issues(&self) -> Vec<ShiftIssue> {
        self.performance.issues(&self.batches)
    }

    /// Rows to persist: downtime first, then production batches.
    pub fn to_new_report(&self) -> NewShiftReport {
        let activities = self
            .downtime
            .iter()
            .map(NewShiftActivity::from)
            .chain(self.batches.iter().map(NewShiftActivity::from))
            .collect();

        NewShiftReport {
            summary: NewShiftSummary {
                key: self.key,
                shift_pattern: self.pattern.code.clone(),
                performance: self.performance,
                updated_at: chrono::Local::now().naive_utc(),
            },
            activities,
        }
    }
}

/// Filters shared by summary and activity listings.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftFilter {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Inclusive lower bound of the report date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound of the report date.
    pub date_to: Option<NaiveDate>,
    /// Restrict to one shift type.
    pub shift: Option<ShiftType>,
    /// Restrict to these machines; empty means all machines.
    pub machine_ids: Vec<i32>,
}

impl ShiftFilter {
    /// Construct a filter that targets every report of `hub_id`.
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            date_from: None,
            date_to: None,
            shift: None,
            machine_ids: Vec::new(),
        }
    }

    /// Restrict to reports dated within `from..=to`.
    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_from = Some(from);
        self.date_to = Some(to);
        self
    }

    pub fn shift(mut self, shift: ShiftType) -> Self {
        self.shift = Some(shift);
        self
    }

    pub fn machines(mut self, machine_ids: impl Into<Vec<i32>>) -> Self {
        self.machine_ids = machine_ids.into();
        self
    }
}

/// Query definition used to list shift summaries.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftSummaryListQuery {
    pub filter: ShiftFilter,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl ShiftSummaryListQuery {
    pub fn new(filter: ShiftFilter) -> Self {
        Self {
            filter,
            pagination: None,
        }
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
