use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::{Deserialize, Serialize};

use crate::domain::machine::Machine;
use crate::domain::report::{summarize_activities, summarize_batches};
use crate::domain::shift::{ChoiceOption, ShiftType, shift_type_options};
use crate::domain::shift_report::{ShiftFilter, ShiftSummary, ShiftSummaryListQuery};
use crate::repository::{MachineReader, ProductReader, ShiftReportReader};
use crate::services::{ServiceError, ServiceResult, ensure_any_role};
use crate::{REPORTS_ACCESS_ROLE, SERVICE_ACCESS_ROLE};

/// Days covered by the dashboard when no date is given.
const DEFAULT_WINDOW_DAYS: u64 = 6;

/// Widest date window the dashboard aggregates over.
const MAX_WINDOW_DAYS: i64 = 366;

/// Query parameters of the dashboard and the summaries API.
///
/// `machine_id` may repeat, so the query string is decoded with
/// `serde_html_form`.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Inclusive start date, `YYYY-MM-DD`.
    pub date_from: Option<String>,
    /// Inclusive end date, `YYYY-MM-DD`.
    pub date_to: Option<String>,
    /// Shift type code; empty or `all` means every shift.
    pub shift: Option<String>,
    #[serde(default)]
    pub machine_id: Vec<i32>,
    pub page: Option<usize>,
}

/// Filters as applied, echoed back to the dashboard form.
#[derive(Debug, Serialize)]
pub struct AppliedFilters {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub shift: Option<ShiftType>,
    pub machine_ids: Vec<i32>,
}

/// Saved summary row with the machine name resolved.
#[derive(Debug, Serialize)]
pub struct SummaryView {
    pub id: i32,
    pub report_date: NaiveDate,
    pub machine_id: i32,
    pub machine_name: String,
    pub shift: ShiftType,
    pub shift_label: &'static str,
    pub shift_pattern: String,
    pub standard_hours: f64,
    pub production_hours: f64,
    pub downtime_hours: f64,
    pub availability: f64,
    pub average_efficiency: f64,
    pub oee: f64,
}

#[derive(Debug, Serialize)]
pub struct ActivityTotalView {
    pub machine_name: String,
    pub activity: String,
    pub total_hours: f64,
    pub average_efficiency: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct BatchOutputView {
    pub machine_name: String,
    pub batch_number: String,
    pub product_name: String,
    pub produced_quantity: f64,
    pub total_batch_output: f64,
}

/// Data required to render the dashboard template.
pub struct DashboardData {
    pub summaries: Paginated<SummaryView>,
    pub activity_totals: Vec<ActivityTotalView>,
    pub batch_outputs: Vec<BatchOutputView>,
    pub machines: Vec<Machine>,
    pub shift_types: Vec<ChoiceOption>,
    pub filters: AppliedFilters,
}

/// Loads summaries, activity totals and batch output for the dashboard.
pub fn load_dashboard<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: DashboardQuery,
) -> ServiceResult<DashboardData>
where
    R: ShiftReportReader + MachineReader + ProductReader + ?Sized,
{
    ensure_any_role(user, &[SERVICE_ACCESS_ROLE, REPORTS_ACCESS_ROLE])?;

    let today = chrono::Local::now().date_naive();
    let page = query.page.unwrap_or(1);
    let (filter, filters) = build_filter(user.hub_id, &query, today)?;

    let machines = repo.list_machines(user.hub_id)?;
    let machine_names: HashMap<i32, String> = machines
        .iter()
        .map(|machine| (machine.id, machine.name.clone()))
        .collect();
    let product_names: HashMap<i32, String> = repo
        .list_products(user.hub_id)?
        .into_iter()
        .map(|product| (product.id, product.name))
        .collect();

    let summaries = paginated_summaries(repo, filter.clone(), page, &machine_names)?;

    let activities = repo.list_shift_activities(&filter)?;
    let activity_totals = summarize_activities(&activities)
        .into_iter()
        .map(|total| ActivityTotalView {
            machine_name: lookup(&machine_names, total.machine_id),
            activity: total.activity.label().to_string(),
            total_hours: total.total_hours,
            average_efficiency: total.average_efficiency,
        })
        .collect();
    let batch_outputs = summarize_batches(&activities)
        .into_iter()
        .map(|output| BatchOutputView {
            machine_name: lookup(&machine_names, output.machine_id),
            batch_number: output.batch_number,
            product_name: lookup(&product_names, output.product_id),
            produced_quantity: output.produced_quantity,
            total_batch_output: output.total_batch_output,
        })
        .collect();

    Ok(DashboardData {
        summaries,
        activity_totals,
        batch_outputs,
        machines,
        shift_types: shift_type_options(),
        filters,
    })
}

/// Paginated summaries only; backs the JSON endpoint.
pub fn list_summaries<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: DashboardQuery,
) -> ServiceResult<Paginated<SummaryView>>
where
    R: ShiftReportReader + MachineReader + ?Sized,
{
    ensure_any_role(user, &[SERVICE_ACCESS_ROLE, REPORTS_ACCESS_ROLE])?;

    let today = chrono::Local::now().date_naive();
    let page = query.page.unwrap_or(1);
    let (filter, _) = build_filter(user.hub_id, &query, today)?;

    let machine_names: HashMap<i32, String> = repo
        .list_machines(user.hub_id)?
        .into_iter()
        .map(|machine| (machine.id, machine.name))
        .collect();

    paginated_summaries(repo, filter, page, &machine_names)
}

fn paginated_summaries<R>(
    repo: &R,
    filter: ShiftFilter,
    page: usize,
    machine_names: &HashMap<i32, String>,
) -> ServiceResult<Paginated<SummaryView>>
where
    R: ShiftReportReader + ?Sized,
{
    let list_query = ShiftSummaryListQuery::new(filter).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    let (total, items) = repo.list_shift_summaries(list_query)?;

    let items = items
        .into_iter()
        .map(|summary| SummaryView::from_summary(summary, machine_names))
        .collect();

    Ok(Paginated::new(
        items,
        page,
        total.div_ceil(DEFAULT_ITEMS_PER_PAGE),
    ))
}

/// Resolve the date window and shift of a query.
///
/// A single given date becomes both bounds; no date at all covers the last
/// week up to `today`. Reversed bounds are swapped. Windows wider than
/// [`MAX_WINDOW_DAYS`] are refused.
fn build_filter(
    hub_id: i32,
    query: &DashboardQuery,
    today: NaiveDate,
) -> ServiceResult<(ShiftFilter, AppliedFilters)> {
    let date_from = parse_date(query.date_from.as_deref())?;
    let date_to = parse_date(query.date_to.as_deref())?;

    let (from, to) = match (date_from, date_to) {
        (Some(from), Some(to)) if from > to => (to, from),
        (Some(from), Some(to)) => (from, to),
        (Some(date), None) | (None, Some(date)) => (date, date),
        (None, None) => (
            today
                .checked_sub_days(Days::new(DEFAULT_WINDOW_DAYS))
                .unwrap_or(today),
            today,
        ),
    };

    if (to - from).num_days() > MAX_WINDOW_DAYS {
        return Err(ServiceError::Form(format!(
            "date range `{from}..{to}` exceeds {MAX_WINDOW_DAYS} days"
        )));
    }

    let shift = match query.shift.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) if value.eq_ignore_ascii_case("all") => None,
        Some(value) => Some(
            value
                .parse::<ShiftType>()
                .map_err(|err| ServiceError::Form(err.to_string()))?,
        ),
    };

    let mut filter = ShiftFilter::new(hub_id)
        .between(from, to)
        .machines(query.machine_id.clone());
    if let Some(shift) = shift {
        filter = filter.shift(shift);
    }

    let applied = AppliedFilters {
        date_from: from,
        date_to: to,
        shift,
        machine_ids: query.machine_id.clone(),
    };

    Ok((filter, applied))
}

fn parse_date(value: Option<&str>) -> ServiceResult<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ServiceError::Form(format!("invalid date `{value}`"))),
    }
}

fn lookup(names: &HashMap<i32, String>, id: i32) -> String {
    names.get(&id).cloned().unwrap_or_else(|| format!("#{id}"))
}

impl SummaryView {
    fn from_summary(summary: ShiftSummary, machine_names: &HashMap<i32, String>) -> Self {
        Self {
            id: summary.id,
            report_date: summary.report_date,
            machine_id: summary.machine_id,
            machine_name: lookup(machine_names, summary.machine_id),
            shift: summary.shift,
            shift_label: summary.shift.label(),
            shift_pattern: summary.shift_pattern,
            standard_hours: summary.standard_hours,
            production_hours: summary.production_hours,
            downtime_hours: summary.downtime_hours,
            availability: summary.availability,
            average_efficiency: summary.average_efficiency,
            oee: summary.oee,
        }
    }
}
