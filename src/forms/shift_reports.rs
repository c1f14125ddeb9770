use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::performance::{BatchEntry, DowntimeEntry, MAX_BATCHES_PER_PRODUCT};
use crate::domain::shift::{DowntimeKind, ShiftType, UnknownCode};
use crate::domain::shift_report::{ShiftReportDraft, ShiftReportKey};

/// Number of batch lines offered by the entry page.
pub const BATCH_ROWS: usize = 10;

/// Maximum allowed length for a batch number.
const BATCH_NUMBER_MAX_LEN: u64 = 64;

/// Maximum allowed length for a downtime comment.
const COMMENT_MAX_LEN: u64 = 512;

/// Result type returned by the shift report form helpers.
pub type ShiftReportFormResult<T> = Result<T, ShiftReportFormError>;

/// Errors that can occur while processing a submitted shift report.
#[derive(Debug, Error)]
pub enum ShiftReportFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The request body could not be decoded.
    #[error("malformed shift report form: {0}")]
    Malformed(#[from] serde_qs::Error),
    #[error("invalid report date `{0}`")]
    InvalidDate(String),
    #[error("a machine must be selected")]
    MissingMachine,
    #[error("a shift pattern must be selected")]
    MissingShiftPattern,
    /// A shift type or downtime kind outside the fixed lists.
    #[error(transparent)]
    UnknownCode(#[from] UnknownCode),
    #[error("{field} has invalid number `{value}`")]
    InvalidNumber { field: String, value: String },
    #[error("{field} cannot be negative")]
    Negative { field: String },
    #[error("downtime `{kind}` needs a comment")]
    MissingComment { kind: String },
    #[error("batch row {row} is missing a product")]
    BatchMissingProduct { row: usize },
    #[error("batch row {row} is missing a batch number")]
    BatchMissingNumber { row: usize },
    #[error("product {product_id} has {count} batches, at most 5 allowed")]
    TooManyBatches { product_id: i32, count: usize },
}

/// One downtime line of the shift form.
#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate)]
pub struct DowntimeRowForm {
    /// Downtime kind code, e.g. `cleaning`.
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub hours: String,
    #[serde(default)]
    #[validate(length(max = COMMENT_MAX_LEN))]
    pub comment: String,
}

/// One production batch line of the shift form.
#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate)]
pub struct BatchRowForm {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    #[validate(length(max = BATCH_NUMBER_MAX_LEN))]
    pub batch_number: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub hours: String,
}

/// Whole shift report as posted for preview and for save.
///
/// Rows arrive as nested keys (`batches[0][product_id]=..`), so the body is
/// decoded with [`ShiftReportForm::from_body`] rather than `web::Form`.
#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate)]
pub struct ShiftReportForm {
    /// Report date in `YYYY-MM-DD`.
    #[serde(default)]
    pub report_date: String,
    #[serde(default)]
    pub machine_id: String,
    /// Shift type code.
    #[serde(default)]
    pub shift: String,
    #[serde(default)]
    pub shift_pattern_id: String,
    #[serde(default)]
    #[validate(nested)]
    pub downtime: Vec<DowntimeRowForm>,
    #[serde(default)]
    #[validate(nested)]
    pub batches: Vec<BatchRowForm>,
    /// Overwrite a report already saved for the same date, machine and shift.
    #[serde(default)]
    pub replace_existing: bool,
}

impl ShiftReportForm {
    /// Decode an urlencoded request body with bracketed row keys.
    pub fn from_body(body: &[u8]) -> ShiftReportFormResult<Self> {
        let config = serde_qs::Config::new(5, false);
        Ok(config.deserialize_bytes(body)?)
    }

    /// Validate the submission and convert it into a draft for `hub_id`.
    ///
    /// Blank batch lines and downtime lines without hours are skipped.
    pub fn into_draft(self, hub_id: i32) -> ShiftReportFormResult<ShiftReportDraft> {
        self.validate()?;

        let report_date = NaiveDate::parse_from_str(self.report_date.trim(), "%Y-%m-%d")
            .map_err(|_| ShiftReportFormError::InvalidDate(self.report_date.clone()))?;

        let machine_id = parse_id(&self.machine_id, "machine")?
            .ok_or(ShiftReportFormError::MissingMachine)?;
        let shift_pattern_id = parse_id(&self.shift_pattern_id, "shift pattern")?
            .ok_or(ShiftReportFormError::MissingShiftPattern)?;
        let shift: ShiftType = self.shift.parse()?;

        let downtime = self
            .downtime
            .iter()
            .filter_map(|row| parse_downtime(row).transpose())
            .collect::<ShiftReportFormResult<Vec<_>>>()?;

        let batches = self
            .batches
            .iter()
            .enumerate()
            .filter_map(|(index, row)| parse_batch(index + 1, row).transpose())
            .collect::<ShiftReportFormResult<Vec<_>>>()?;

        check_batches_per_product(&batches)?;

        Ok(ShiftReportDraft {
            key: ShiftReportKey {
                hub_id,
                report_date,
                machine_id,
                shift,
            },
            shift_pattern_id,
            downtime,
            batches,
        })
    }

    /// Lay the form out for the entry page: one downtime line per kind in
    /// the fixed order and at least [`BATCH_ROWS`] batch lines.
    ///
    /// Whatever was already entered is kept.
    pub fn with_blank_rows(mut self) -> Self {
        let mut downtime = Vec::with_capacity(DowntimeKind::ALL.len() + self.downtime.len());
        for kind in DowntimeKind::ALL.iter() {
            let code = kind.as_str();
            let row = match self.downtime.iter().position(|row| row.kind == code) {
                Some(index) => self.downtime.remove(index),
                None => DowntimeRowForm {
                    kind: code.to_string(),
                    ..Default::default()
                },
            };
            downtime.push(row);
        }
        downtime.append(&mut self.downtime);
        self.downtime = downtime;

        if self.batches.len() < BATCH_ROWS {
            self.batches.resize_with(BATCH_ROWS, BatchRowForm::default);
        }
        self
    }
}

fn parse_downtime(row: &DowntimeRowForm) -> ShiftReportFormResult<Option<DowntimeEntry>> {
    let kind: DowntimeKind = row.kind.parse()?;
    let Some(hours) = parse_number(&row.hours, kind.label())? else {
        return Ok(None);
    };
    if hours == 0.0 {
        return Ok(None);
    }

    let comment = sanitize_comment(&row.comment);
    if comment.is_empty() {
        return Err(ShiftReportFormError::MissingComment {
            kind: kind.label().to_string(),
        });
    }

    Ok(Some(DowntimeEntry {
        kind,
        hours,
        comment: Some(comment),
    }))
}

fn parse_batch(row_number: usize, row: &BatchRowForm) -> ShiftReportFormResult<Option<BatchEntry>> {
    let batch_number = sanitize_batch_number(&row.batch_number);
    let is_blank = row.product_id.trim().is_empty()
        && batch_number.is_empty()
        && row.quantity.trim().is_empty()
        && row.hours.trim().is_empty();
    if is_blank {
        return Ok(None);
    }

    let product_id = parse_id(&row.product_id, "product")?
        .ok_or(ShiftReportFormError::BatchMissingProduct { row: row_number })?;
    if batch_number.is_empty() {
        return Err(ShiftReportFormError::BatchMissingNumber { row: row_number });
    }

    let quantity = parse_number(&row.quantity, &format!("batch {batch_number} quantity"))?
        .unwrap_or_default();
    let hours =
        parse_number(&row.hours, &format!("batch {batch_number} hours"))?.unwrap_or_default();

    Ok(Some(BatchEntry::new(product_id, batch_number, quantity, hours)))
}

fn check_batches_per_product(batches: &[BatchEntry]) -> ShiftReportFormResult<()> {
    let mut counts: HashMap<i32, usize> = HashMap::new();
    let mut order = Vec::new();
    for batch in batches {
        let count = counts.entry(batch.product_id).or_default();
        if *count == 0 {
            order.push(batch.product_id);
        }
        *count += 1;
    }

    for product_id in order {
        let count = counts.get(&product_id).copied().unwrap_or_default();
        if count > MAX_BATCHES_PER_PRODUCT {
            return Err(ShiftReportFormError::TooManyBatches { product_id, count });
        }
    }

    Ok(())
}

fn parse_id(value: &str, field: &str) -> ShiftReportFormResult<Option<i32>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i32>()
        .map(Some)
        .map_err(|_| ShiftReportFormError::InvalidNumber {
            field: field.to_string(),
            value: trimmed.to_string(),
        })
}

/// Parse a non-negative decimal, accepting `,` as the decimal separator.
fn parse_number(value: &str, field: &str) -> ShiftReportFormResult<Option<f64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let number = trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| ShiftReportFormError::InvalidNumber {
            field: field.to_string(),
            value: trimmed.to_string(),
        })?;

    if number < 0.0 {
        return Err(ShiftReportFormError::Negative {
            field: field.to_string(),
        });
    }

    Ok(Some(number))
}

fn sanitize_batch_number(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|ch| !ch.is_control())
        .collect::<String>()
}

fn sanitize_comment(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if !ch.is_control() {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}
