use std::io::{Read, Seek};

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use csv::Trim;
use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::machine::NewMachine;
use crate::domain::product::NewProduct;
use crate::domain::shift_pattern::NewShiftPattern;

/// Errors that can occur while parsing an uploaded reference CSV file.
#[derive(Debug, Error)]
pub enum ReferenceUploadError {
    #[error("Error reading csv file")]
    FileRead(#[from] std::io::Error),
    #[error("Error parsing csv file: {0}")]
    CsvParse(#[from] csv::Error),
    #[error("row {row} is missing `{column}`")]
    MissingValue { row: usize, column: &'static str },
    #[error("row {row} has invalid `{column}` value `{value}`")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("upload contains no rows")]
    EmptyUpload,
}

pub type ReferenceUploadResult<T> = Result<T, ReferenceUploadError>;

#[derive(MultipartForm)]
/// Multipart form for uploading machines (`name`, `qty_uom`).
pub struct UploadMachinesForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

#[derive(MultipartForm)]
/// Multipart form for uploading products (`name`, `batch_size`,
/// `units_per_box`, `primary_units_per_box`, `oracle_code`).
pub struct UploadProductsForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

#[derive(MultipartForm)]
/// Multipart form for uploading shift patterns (`code`, `working_hours`,
/// optional `partial`).
pub struct UploadShiftPatternsForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

#[derive(MultipartForm)]
/// Multipart form for uploading standard rates (`product`, `machine`,
/// `standard_rate`); products and machines are referenced by name.
pub struct UploadStandardRatesForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

/// Standard rate row before product and machine names are resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedStandardRate {
    /// CSV line number, header included.
    pub row: usize,
    pub product: String,
    pub machine: String,
    pub standard_rate: f64,
}

impl UploadMachinesForm {
    pub fn into_new_machines(&mut self, hub_id: i32) -> ReferenceUploadResult<Vec<NewMachine>> {
        self.csv.file.rewind()?;
        parse_machines(self.csv.file.by_ref(), hub_id)
    }
}

impl UploadProductsForm {
    pub fn into_new_products(&mut self, hub_id: i32) -> ReferenceUploadResult<Vec<NewProduct>> {
        self.csv.file.rewind()?;
        parse_products(self.csv.file.by_ref(), hub_id)
    }
}

impl UploadShiftPatternsForm {
    pub fn into_new_shift_patterns(
        &mut self,
        hub_id: i32,
    ) -> ReferenceUploadResult<Vec<NewShiftPattern>> {
        self.csv.file.rewind()?;
        parse_shift_patterns(self.csv.file.by_ref(), hub_id)
    }
}

impl UploadStandardRatesForm {
    pub fn into_named_rates(&mut self) -> ReferenceUploadResult<Vec<NamedStandardRate>> {
        self.csv.file.rewind()?;
        parse_standard_rates(self.csv.file.by_ref())
    }
}

#[derive(Deserialize)]
struct MachineCsvRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    qty_uom: Option<String>,
}

#[derive(Deserialize)]
struct ProductCsvRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    batch_size: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    units_per_box: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    primary_units_per_box: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    oracle_code: Option<String>,
}

#[derive(Deserialize)]
struct ShiftPatternCsvRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    code: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    working_hours: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    partial: Option<String>,
}

#[derive(Deserialize)]
struct StandardRateCsvRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    product: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    machine: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    standard_rate: Option<String>,
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader)
}

fn parse_machines<R: Read>(reader: R, hub_id: i32) -> ReferenceUploadResult<Vec<NewMachine>> {
    let mut machines = Vec::new();

    for (index, row) in csv_reader(reader).deserialize::<MachineCsvRow>().enumerate() {
        let row_number = index + 2;
        let record = row?;

        let Some(name) = record.name else {
            continue;
        };
        let qty_uom = record.qty_uom.ok_or(ReferenceUploadError::MissingValue {
            row: row_number,
            column: "qty_uom",
        })?;

        machines.push(NewMachine::new(hub_id, name, qty_uom));
    }

    non_empty(machines)
}

fn parse_products<R: Read>(reader: R, hub_id: i32) -> ReferenceUploadResult<Vec<NewProduct>> {
    let mut products = Vec::new();

    for (index, row) in csv_reader(reader).deserialize::<ProductCsvRow>().enumerate() {
        let row_number = index + 2;
        let record = row?;

        let Some(name) = record.name else {
            continue;
        };

        let mut product = NewProduct::new(hub_id, name);
        if let Some(batch_size) = parse_number(row_number, "batch_size", record.batch_size)? {
            product = product.with_batch_size(batch_size);
        }
        let units_per_box = parse_number(row_number, "units_per_box", record.units_per_box)?;
        let primary_units_per_box = parse_number(
            row_number,
            "primary_units_per_box",
            record.primary_units_per_box,
        )?;
        if units_per_box.is_some() || primary_units_per_box.is_some() {
            let units_per_box = units_per_box.unwrap_or(product.units_per_box);
            let primary_units_per_box =
                primary_units_per_box.unwrap_or(product.primary_units_per_box);
            product = product.with_packaging(units_per_box, primary_units_per_box);
        }
        if let Some(oracle_code) = record.oracle_code {
            product = product.with_oracle_code(oracle_code);
        }

        products.push(product);
    }

    non_empty(products)
}

fn parse_shift_patterns<R: Read>(
    reader: R,
    hub_id: i32,
) -> ReferenceUploadResult<Vec<NewShiftPattern>> {
    let mut patterns = Vec::new();

    for (index, row) in csv_reader(reader)
        .deserialize::<ShiftPatternCsvRow>()
        .enumerate()
    {
        let row_number = index + 2;
        let record = row?;

        let Some(code) = record.code else {
            continue;
        };
        let working_hours = parse_number(row_number, "working_hours", record.working_hours)?
            .ok_or(ReferenceUploadError::MissingValue {
                row: row_number,
                column: "working_hours",
            })?;

        let mut pattern = NewShiftPattern::new(hub_id, code, working_hours);
        if let Some(partial) = record.partial {
            pattern = pattern.partial(parse_flag(&partial));
        }

        patterns.push(pattern);
    }

    non_empty(patterns)
}

fn parse_standard_rates<R: Read>(reader: R) -> ReferenceUploadResult<Vec<NamedStandardRate>> {
    let mut rates = Vec::new();

    for (index, row) in csv_reader(reader)
        .deserialize::<StandardRateCsvRow>()
        .enumerate()
    {
        let row_number = index + 2;
        let record = row?;

        if record.product.is_none() && record.machine.is_none() {
            continue;
        }
        let product = record.product.ok_or(ReferenceUploadError::MissingValue {
            row: row_number,
            column: "product",
        })?;
        let machine = record.machine.ok_or(ReferenceUploadError::MissingValue {
            row: row_number,
            column: "machine",
        })?;
        let standard_rate = parse_number(row_number, "standard_rate", record.standard_rate)?
            .ok_or(ReferenceUploadError::MissingValue {
                row: row_number,
                column: "standard_rate",
            })?;

        rates.push(NamedStandardRate {
            row: row_number,
            product,
            machine,
            standard_rate,
        });
    }

    non_empty(rates)
}

fn non_empty<T>(rows: Vec<T>) -> ReferenceUploadResult<Vec<T>> {
    if rows.is_empty() {
        return Err(ReferenceUploadError::EmptyUpload);
    }
    Ok(rows)
}

/// Non-negative decimal; `,` is accepted as the decimal separator.
fn parse_number(
    row: usize,
    column: &'static str,
    value: Option<String>,
) -> ReferenceUploadResult<Option<f64>> {
    let Some(value) = value else {
        return Ok(None);
    };

    value
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite() && *number >= 0.0)
        .map(Some)
        .ok_or(ReferenceUploadError::InvalidNumber { row, column, value })
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "да"
    )
}
