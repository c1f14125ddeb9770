//! Shift performance arithmetic.
//!
//! A shift is described by its production batches, its downtime entries and
//! the standard working hours of its shift pattern. From those the module
//! derives per-batch rate and efficiency, shift availability, the average
//! efficiency over batches and OEE.
//!
//! Every division goes through [`ratio`], so a zero denominator yields `0.0`
//! instead of `inf` or `NaN`. Efficiencies are not clamped; values above
//! [`MAX_EFFICIENCY`] surface as a [`ShiftIssue`] instead.

use serde::Serialize;
use thiserror::Error;

use crate::domain::shift::DowntimeKind;

/// Fixed utilization factor applied on top of availability and efficiency.
pub const UTILIZATION_FACTOR: f64 = 0.99;

/// Highest efficiency a batch may report.
pub const MAX_EFFICIENCY: f64 = 1.0;

/// Share of standard hours that must be accounted for in a full shift.
pub const MIN_RECORDED_SHARE: f64 = 0.75;

/// Batches a single product may contribute to one shift.
pub const MAX_BATCHES_PER_PRODUCT: usize = 5;

/// Absorbs rounding noise of summed decimal hours (`7.9 + 0.1`).
const HOURS_TOLERANCE: f64 = 1e-9;

/// Absorbs rounding noise of `quantity / hours / standard` (`21 / 0.7 / 30`).
const EFFICIENCY_TOLERANCE: f64 = 1e-9;

/// Divide, treating a zero or non-finite denominator as "no result".
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        0.0
    } else {
        numerator / denominator
    }
}

/// One production batch as entered by the operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntry {
    pub product_id: i32,
    pub batch_number: String,
    /// Produced quantity in the machine's unit.
    pub quantity: f64,
    /// Hours consumed by the batch.
    pub hours: f64,
}

impl BatchEntry {
    pub fn new(
        product_id: i32,
        batch_number: impl Into<String>,
        quantity: f64,
        hours: f64,
    ) -> Self {
        Self {
            product_id,
            batch_number: batch_number.into(),
            quantity,
            hours,
        }
    }

    /// Produced quantity per hour.
    pub fn rate(&self) -> f64 {
        ratio(self.quantity, self.hours)
    }
}

/// Downtime recorded against one of the fixed downtime kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DowntimeEntry {
    pub kind: DowntimeKind,
    pub hours: f64,
    pub comment: Option<String>,
}

/// A batch together with the standard rate it was measured against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatedBatch {
    pub batch: BatchEntry,
    pub rate: f64,
    pub standard_rate: f64,
    pub efficiency: f64,
}

impl RatedBatch {
    pub fn new(batch: BatchEntry, standard_rate: f64) -> Self {
        let rate = batch.rate();
        let efficiency = ratio(rate, standard_rate);
        Self {
            batch,
            rate,
            standard_rate,
            efficiency,
        }
    }
}

/// Products of a shift for which no usable standard rate exists on the machine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("no usable standard rate for products {product_ids:?}")]
pub struct MissingStandardRates {
    pub product_ids: Vec<i32>,
}

/// Attach standard rates to every batch.
///
/// `standard_rate` resolves a product id to the rate configured for the
/// shift's machine. A rate that is missing, zero, negative or not finite
/// makes the whole set fail; the error lists each offending product once, in
/// the order it was first seen.
pub fn rate_batches<F>(
    batches: Vec<BatchEntry>,
    mut standard_rate: F,
) -> Result<Vec<RatedBatch>, MissingStandardRates>
where
    F: FnMut(i32) -> Option<f64>,
{
    let mut rated = Vec::with_capacity(batches.len());
    let mut missing = Vec::new();

    for batch in batches {
        match standard_rate(batch.product_id).filter(|rate| rate.is_finite() && *rate > 0.0) {
            Some(rate) => rated.push(RatedBatch::new(batch, rate)),
            None => {
                if !missing.contains(&batch.product_id) {
                    missing.push(batch.product_id);
                }
            }
        }
    }

    if missing.is_empty() {
        Ok(rated)
    } else {
        Err(MissingStandardRates {
            product_ids: missing,
        })
    }
}

/// Fraction of the shift spent producing.
///
/// Full shifts compare production time with the standard hours; partial
/// shifts only know the time actually recorded, so production is compared
/// with production plus downtime.
pub fn availability(
    production_hours: f64,
    downtime_hours: f64,
    standard_hours: f64,
    is_partial: bool,
) -> f64 {
    if is_partial {
        ratio(production_hours, production_hours + downtime_hours)
    } else {
        ratio(production_hours, standard_hours)
    }
}

/// Arithmetic mean of batch efficiencies, `0.0` for a shift without batches.
pub fn average_efficiency<I>(efficiencies: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = efficiencies
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    ratio(sum, count as f64)
}

pub fn oee(availability: f64, average_efficiency: f64) -> f64 {
    UTILIZATION_FACTOR * availability * average_efficiency
}

/// Problems that prevent a computed shift from being saved.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ShiftIssue {
    #[error("batch `{batch_number}` efficiency {efficiency:.3} exceeds 1")]
    EfficiencyAboveLimit { batch_number: String, efficiency: f64 },
    #[error("recorded time {recorded:.2} h exceeds the shift standard time {standard:.2} h")]
    RecordedTimeExceedsShift { recorded: f64, standard: f64 },
    #[error("recorded time {recorded:.2} h is below 75% of the shift standard time ({minimum:.2} h)")]
    RecordedTimeBelowMinimum { recorded: f64, minimum: f64 },
}

/// Computed figures of one shift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShiftPerformance {
    pub standard_hours: f64,
    pub production_hours: f64,
    pub downtime_hours: f64,
    pub is_partial: bool,
    pub availability: f64,
    pub average_efficiency: f64,
    pub oee: f64,
}

impl ShiftPerformance {
    pub fn evaluate(
        batches: &[RatedBatch],
        downtime: &[DowntimeEntry],
        standard_hours: f64,
        is_partial: bool,
    ) -> Self {
        let production_hours: f64 = batches.iter().map(|rated| rated.batch.hours).sum();
        let downtime_hours: f64 = downtime.iter().map(|entry| entry.hours).sum();
        let availability = availability(
            production_hours,
            downtime_hours,
            standard_hours,
            is_partial,
        );
        let average_efficiency = average_efficiency(batches.iter().map(|rated| rated.efficiency));

        Self {
            standard_hours,
            production_hours,
            downtime_hours,
            is_partial,
            availability,
            average_efficiency,
            oee: oee(availability, average_efficiency),
        }
    }

    /// Production and downtime hours together.
    pub fn recorded_hours(&self) -> f64 {
        self.production_hours + self.downtime_hours
    }

    /// Check the efficiency cap and the recorded-time window.
    ///
    /// Recorded time may never exceed the standard hours. Full shifts must
    /// also account for at least [`MIN_RECORDED_SHARE`] of them.
    pub fn issues(&self, batches: &[RatedBatch]) -> Vec<ShiftIssue> {
        let mut issues: Vec<ShiftIssue> = batches
            .iter()
            .filter(|rated| rated.efficiency > MAX_EFFICIENCY + EFFICIENCY_TOLERANCE)
            .map(|rated| ShiftIssue::EfficiencyAboveLimit {
                batch_number: rated.batch.batch_number.clone(),
                efficiency: rated.efficiency,
            })
            .collect();

        let recorded = self.recorded_hours();
        if recorded > self.standard_hours + HOURS_TOLERANCE {
            issues.push(ShiftIssue::RecordedTimeExceedsShift {
                recorded,
                standard: self.standard_hours,
            });
        } else if !self.is_partial {
            let minimum = MIN_RECORDED_SHARE * self.standard_hours;
            if recorded + HOURS_TOLERANCE < minimum {
                issues.push(ShiftIssue::RecordedTimeBelowMinimum { recorded, minimum });
            }
        }

        issues
    }
}
