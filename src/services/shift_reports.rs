use std::collections::HashMap;

use chrono::NaiveDate;
use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Serialize;

use crate::domain::machine::Machine;
use crate::domain::performance::{MissingStandardRates, ShiftPerformance};
use crate::domain::product::Product;
use crate::domain::shift::{ChoiceOption, downtime_kind_options, shift_type_options};
use crate::domain::shift_pattern::ShiftPattern;
use crate::domain::shift_report::{
    EvaluatedShiftReport, ShiftActivity, ShiftReport, ShiftReportDraft, ShiftSummary,
};
use crate::forms::shift_reports::ShiftReportForm;
use crate::repository::{
    MachineReader, ProductReader, ShiftPatternReader, ShiftReportReader, ShiftReportWriter,
    StandardRateReader,
};
use crate::services::{ServiceError, ServiceResult, ensure_any_role};
use crate::{REPORTS_ACCESS_ROLE, SERVICE_ACCESS_ROLE};

/// Reference data needed to render an empty shift report form.
pub struct NewReportPageData {
    pub machines: Vec<Machine>,
    pub products: Vec<Product>,
    pub shift_patterns: Vec<ShiftPattern>,
    pub shift_types: Vec<ChoiceOption>,
    pub downtime_kinds: Vec<ChoiceOption>,
}

/// Outcome of a preview: the computed figures plus everything that would
/// block saving. Nothing is written.
#[derive(Debug, Serialize)]
pub struct ShiftReportPreview {
    /// The submitted form, echoed back so it can be saved as is.
    pub form: ShiftReportForm,
    pub machine: Machine,
    pub shift_pattern: ShiftPattern,
    pub report_date: NaiveDate,
    pub shift_label: &'static str,
    /// `None` when a standard rate is missing.
    pub performance: Option<ShiftPerformance>,
    pub batches: Vec<BatchView>,
    /// Human readable problems; empty when the report can be saved.
    pub problems: Vec<String>,
    /// Summary already saved for the same date, machine and shift.
    pub existing: Option<ShiftSummary>,
}

impl ShiftReportPreview {
    pub fn can_save(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Production batch row of a preview.
#[derive(Debug, Serialize)]
pub struct BatchView {
    pub product_name: String,
    pub batch_number: String,
    pub quantity: f64,
    pub hours: f64,
    pub rate: f64,
    pub standard_rate: f64,
    pub efficiency: f64,
}

/// A saved report prepared for display.
#[derive(Debug, Serialize)]
pub struct ShiftReportPageData {
    pub summary: ShiftSummary,
    pub machine_name: String,
    pub qty_uom: String,
    pub shift_label: &'static str,
    pub activities: Vec<ActivityView>,
}

/// Saved activity row with names resolved.
#[derive(Debug, Serialize)]
pub struct ActivityView {
    pub activity: String,
    pub is_production: bool,
    pub hours: f64,
    pub product_name: Option<String>,
    pub batch_number: Option<String>,
    pub quantity: Option<f64>,
    pub comment: Option<String>,
    pub rate: Option<f64>,
    pub standard_rate: Option<f64>,
    pub efficiency: Option<f64>,
}

/// Loads machines, products and patterns for the report entry form.
pub fn load_new_report_page<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<NewReportPageData>
where
    R: MachineReader + ProductReader + ShiftPatternReader + ?Sized,
{
    ensure_any_role(user, &[SERVICE_ACCESS_ROLE])?;

    Ok(NewReportPageData {
        machines: repo.list_machines(user.hub_id)?,
        products: repo.list_products(user.hub_id)?,
        shift_patterns: repo.list_shift_patterns(user.hub_id)?,
        shift_types: shift_type_options(),
        downtime_kinds: downtime_kind_options(),
    })
}

/// Computes a submitted report and lists what would block saving it.
pub fn preview_shift_report<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ShiftReportForm,
) -> ServiceResult<ShiftReportPreview>
where
    R: MachineReader
        + ProductReader
        + ShiftPatternReader
        + StandardRateReader
        + ShiftReportReader
        + ?Sized,
{
    ensure_any_role(user, &[SERVICE_ACCESS_ROLE])?;

    let draft = form
        .clone()
        .into_draft(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let key = draft.key;

    let (machine, shift_pattern, evaluated) = evaluate_draft(repo, draft)?;
    let existing = repo.find_shift_summary(&key)?;
    let product_names = product_names(repo, user.hub_id)?;

    let (performance, batches, problems) = match evaluated {
        Ok(report) => {
            let problems = report.issues().iter().map(ToString::to_string).collect();
            let batches = report
                .batches
                .iter()
                .map(|rated| BatchView {
                    product_name: product_name(&product_names, rated.batch.product_id),
                    batch_number: rated.batch.batch_number.clone(),
                    quantity: rated.batch.quantity,
                    hours: rated.batch.hours,
                    rate: rated.rate,
                    standard_rate: rated.standard_rate,
                    efficiency: rated.efficiency,
                })
                .collect();
            (Some(report.performance), batches, problems)
        }
        Err(missing) => (
            None,
            Vec::new(),
            vec![missing_rates_message(&missing, &product_names, &machine)],
        ),
    };

    Ok(ShiftReportPreview {
        form,
        machine,
        shift_pattern,
        report_date: key.report_date,
        shift_label: key.shift.label(),
        performance,
        batches,
        problems,
        existing,
    })
}

/// Validates, computes and stores a shift report.
///
/// Any validation problem rejects the request before a row is written. An
/// existing report for the same key yields [`ServiceError::Conflict`] unless
/// the form asks to replace it.
pub fn save_shift_report<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ShiftReportForm,
) -> ServiceResult<ShiftReport>
where
    R: MachineReader
        + ProductReader
        + ShiftPatternReader
        + StandardRateReader
        + ShiftReportReader
        + ShiftReportWriter
        + ?Sized,
{
    ensure_any_role(user, &[SERVICE_ACCESS_ROLE])?;

    let replace_existing = form.replace_existing;
    let draft = form
        .into_draft(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let (machine, _, evaluated) = evaluate_draft(repo, draft)?;
    let report = match evaluated {
        Ok(report) => report,
        Err(missing) => {
            let names = product_names(repo, user.hub_id)?;
            return Err(ServiceError::Form(missing_rates_message(
                &missing, &names, &machine,
            )));
        }
    };

    let issues = report.issues();
    if !issues.is_empty() {
        let message = issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ServiceError::Form(message));
    }

    let existing = repo.find_shift_summary(&report.key)?;
    let new_report = report.to_new_report();

    let saved = match existing {
        Some(_) if !replace_existing => return Err(ServiceError::Conflict),
        Some(previous) => {
            log::info!(
                "Replacing shift report {} for machine {} on {} ({})",
                previous.id,
                machine.name,
                report.key.report_date,
                report.key.shift
            );
            repo.replace_shift_report(&new_report)?
        }
        None => repo.create_shift_report(&new_report)?,
    };

    log::info!(
        "Saved shift report {} for machine {} on {} ({}), OEE {:.3}",
        saved.summary.id,
        machine.name,
        saved.summary.report_date,
        saved.summary.shift,
        saved.summary.oee
    );

    Ok(saved)
}

/// Loads a saved report of the user's hub.
pub fn show_shift_report<R>(
    repo: &R,
    user: &AuthenticatedUser,
    summary_id: i32,
) -> ServiceResult<ShiftReportPageData>
where
    R: ShiftReportReader + MachineReader + ProductReader + ?Sized,
{
    ensure_any_role(user, &[SERVICE_ACCESS_ROLE, REPORTS_ACCESS_ROLE])?;

    let ShiftReport {
        summary,
        activities,
    } = repo
        .get_shift_report(summary_id, user.hub_id)?
        .ok_or(ServiceError::NotFound)?;

    let machine = repo.get_machine_by_id(summary.machine_id, user.hub_id)?;
    let names = product_names(repo, user.hub_id)?;

    let (machine_name, qty_uom) = match machine {
        Some(machine) => (machine.name, machine.qty_uom),
        None => (format!("#{}", summary.machine_id), String::new()),
    };

    Ok(ShiftReportPageData {
        shift_label: summary.shift.label(),
        machine_name,
        qty_uom,
        activities: activities
            .into_iter()
            .map(|activity| ActivityView::from_activity(activity, &names))
            .collect(),
        summary,
    })
}

/// Deletes a saved report together with its activities.
pub fn delete_shift_report<R>(repo: &R, user: &AuthenticatedUser, summary_id: i32) -> ServiceResult<()>
where
    R: ShiftReportWriter + ?Sized,
{
    ensure_any_role(user, &[SERVICE_ACCESS_ROLE])?;

    repo.delete_shift_report(summary_id, user.hub_id)?;
    log::info!("Deleted shift report {summary_id} of hub {}", user.hub_id);

    Ok(())
}

type Evaluation = (
    Machine,
    ShiftPattern,
    Result<EvaluatedShiftReport, MissingStandardRates>,
);

fn evaluate_draft<R>(repo: &R, draft: ShiftReportDraft) -> ServiceResult<Evaluation>
where
    R: MachineReader + ShiftPatternReader + StandardRateReader + ?Sized,
{
    let hub_id = draft.key.hub_id;

    let machine = repo
        .get_machine_by_id(draft.key.machine_id, hub_id)?
        .ok_or_else(|| ServiceError::Form("Unknown machine".to_string()))?;
    let pattern = repo
        .get_shift_pattern_by_id(draft.shift_pattern_id, hub_id)?
        .ok_or_else(|| ServiceError::Form("Unknown shift pattern".to_string()))?;

    let rates: HashMap<i32, f64> = repo
        .list_machine_rates(machine.id, hub_id)?
        .into_iter()
        .map(|rate| (rate.product_id, rate.standard_rate))
        .collect();

    let evaluated =
        EvaluatedShiftReport::evaluate(draft, pattern.clone(), |product_id| {
            rates.get(&product_id).copied()
        });

    Ok((machine, pattern, evaluated))
}

fn product_names<R>(repo: &R, hub_id: i32) -> ServiceResult<HashMap<i32, String>>
where
    R: ProductReader + ?Sized,
{
    Ok(repo
        .list_products(hub_id)?
        .into_iter()
        .map(|product| (product.id, product.name))
        .collect())
}

fn product_name(names: &HashMap<i32, String>, product_id: i32) -> String {
    names
        .get(&product_id)
        .cloned()
        .unwrap_or_else(|| format!("#{product_id}"))
}

fn missing_rates_message(
    missing: &MissingStandardRates,
    names: &HashMap<i32, String>,
    machine: &Machine,
) -> String {
    let products = missing
        .product_ids
        .iter()
        .map(|product_id| product_name(names, *product_id))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "No usable standard rate on machine {} for: {products}",
        machine.name
    )
}

impl ActivityView {
    fn from_activity(activity: ShiftActivity, names: &HashMap<i32, String>) -> Self {
        Self {
            activity: activity.activity.label().to_string(),
            is_production: activity.activity.is_production(),
            hours: activity.hours,
            product_name: activity
                .product_id
                .map(|product_id| product_name(names, product_id)),
            batch_number: activity.batch_number,
            quantity: activity.quantity,
            comment: activity.comment,
            rate: activity.rate,
            standard_rate: activity.standard_rate,
            efficiency: activity.efficiency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use pushkind_common::repository::errors::RepositoryResult;

    use crate::domain::product::NewProduct;
    use crate::domain::shift::{ActivityKind, ShiftType};
    use crate::domain::shift_report::{NewShiftReport, ShiftReportKey};
    use crate::domain::standard_rate::StandardRate;
    use crate::forms::shift_reports::{BatchRowForm, DowntimeRowForm};
    use crate::repository::mock::{
        MockMachineReader, MockProductReader, MockShiftPatternReader, MockShiftReportReader,
        MockShiftReportWriter, MockStandardRateReader,
    };

    const HUB: i32 = 7;

    fn datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .and_then(|date| date.and_hms_opt(6, 0, 0))
            .unwrap_or_default()
    }

    fn user_with_roles(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "operator".to_string(),
            email: "operator@example.com".to_string(),
            hub_id: HUB,
            name: "Operator".to_string(),
            roles: roles.iter().map(|role| (*role).to_string()).collect(),
            exp: 0,
        }
    }

    fn machine() -> Machine {
        Machine {
            id: 3,
            hub_id: HUB,
            name: "Blister 1".to_string(),
            qty_uom: "blisters".to_string(),
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn pattern() -> ShiftPattern {
        ShiftPattern {
            id: 2,
            hub_id: HUB,
            code: "8h".to_string(),
            working_hours: 8.0,
            is_partial: false,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn product(id: i32, name: &str) -> Product {
        let new = NewProduct::new(HUB, name);
        Product {
            id,
            hub_id: HUB,
            name: new.name,
            batch_size: new.batch_size,
            units_per_box: new.units_per_box,
            primary_units_per_box: new.primary_units_per_box,
            oracle_code: None,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn rate(product_id: i32, standard_rate: f64) -> StandardRate {
        StandardRate {
            id: product_id,
            hub_id: HUB,
            product_id,
            machine_id: 3,
            standard_rate,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn summary(id: i32) -> ShiftSummary {
        ShiftSummary {
            id,
            hub_id: HUB,
            report_date: datetime().date(),
            machine_id: 3,
            shift: ShiftType::Day,
            shift_pattern: "8h".to_string(),
            standard_hours: 8.0,
            production_hours: 6.0,
            downtime_hours: 1.0,
            availability: 0.75,
            average_efficiency: 0.9,
            oee: 0.66825,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    /// Six productive hours at 90% plus one hour of cleaning on an 8h shift.
    fn form(replace_existing: bool) -> ShiftReportForm {
        ShiftReportForm {
            report_date: "2025-03-14".to_string(),
            machine_id: "3".to_string(),
            shift: "day".to_string(),
            shift_pattern_id: "2".to_string(),
            downtime: vec![DowntimeRowForm {
                kind: "cleaning".to_string(),
                hours: "1".to_string(),
                comment: "line wash".to_string(),
            }],
            batches: vec![
                BatchRowForm {
                    product_id: "10".to_string(),
                    batch_number: "L-1".to_string(),
                    quantity: "270".to_string(),
                    hours: "3".to_string(),
                },
                BatchRowForm {
                    product_id: "11".to_string(),
                    batch_number: "L-2".to_string(),
                    quantity: "540".to_string(),
                    hours: "3".to_string(),
                },
            ],
            replace_existing,
        }
    }

    #[derive(Default)]
    struct FakeRepo {
        machine_reader: MockMachineReader,
        product_reader: MockProductReader,
        pattern_reader: MockShiftPatternReader,
        rate_reader: MockStandardRateReader,
        report_reader: MockShiftReportReader,
        report_writer: MockShiftReportWriter,
    }

    impl FakeRepo {
        fn with_reference(rates: Vec<StandardRate>) -> Self {
            let mut repo = FakeRepo::default();
            repo.machine_reader
                .expect_get_machine_by_id()
                .returning(|_, _| Ok(Some(machine())));
            repo.pattern_reader
                .expect_get_shift_pattern_by_id()
                .returning(|_, _| Ok(Some(pattern())));
            repo.rate_reader
                .expect_list_machine_rates()
                .returning(move |_, _| Ok(rates.clone()));
            repo.product_reader
                .expect_list_products()
                .returning(|_| Ok(vec![product(10, "Paracetamol"), product(11, "Ibuprofen")]));
            repo
        }
    }

    impl MachineReader for FakeRepo {
        fn get_machine_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Machine>> {
            self.machine_reader.get_machine_by_id(id, hub_id)
        }

        fn list_machines(&self, hub_id: i32) -> RepositoryResult<Vec<Machine>> {
            self.machine_reader.list_machines(hub_id)
        }
    }

    impl ProductReader for FakeRepo {
        fn list_products(&self, hub_id: i32) -> RepositoryResult<Vec<Product>> {
            self.product_reader.list_products(hub_id)
        }
    }

    impl ShiftPatternReader for FakeRepo {
        fn get_shift_pattern_by_id(
            &self,
            id: i32,
            hub_id: i32,
        ) -> RepositoryResult<Option<ShiftPattern>> {
            self.pattern_reader.get_shift_pattern_by_id(id, hub_id)
        }

        fn list_shift_patterns(&self, hub_id: i32) -> RepositoryResult<Vec<ShiftPattern>> {
            self.pattern_reader.list_shift_patterns(hub_id)
        }
    }

    impl StandardRateReader for FakeRepo {
        fn list_standard_rates(&self, hub_id: i32) -> RepositoryResult<Vec<StandardRate>> {
            self.rate_reader.list_standard_rates(hub_id)
        }

        fn list_machine_rates(
            &self,
            machine_id: i32,
            hub_id: i32,
        ) -> RepositoryResult<Vec<StandardRate>> {
            self.rate_reader.list_machine_rates(machine_id, hub_id)
        }
    }

    impl ShiftReportReader for FakeRepo {
        fn find_shift_summary(
            &self,
            key: &ShiftReportKey,
        ) -> RepositoryResult<Option<ShiftSummary>> {
            self.report_reader.find_shift_summary(key)
        }

        fn get_shift_report(
            &self,
            summary_id: i32,
            hub_id: i32,
        ) -> RepositoryResult<Option<ShiftReport>> {
            self.report_reader.get_shift_report(summary_id, hub_id)
        }

        fn list_shift_summaries(
            &self,
            query: crate::domain::shift_report::ShiftSummaryListQuery,
        ) -> RepositoryResult<(usize, Vec<ShiftSummary>)> {
            self.report_reader.list_shift_summaries(query)
        }

        fn list_shift_activities(
            &self,
            filter: &crate::domain::shift_report::ShiftFilter,
        ) -> RepositoryResult<Vec<ShiftActivity>> {
            self.report_reader.list_shift_activities(filter)
        }
    }

    impl ShiftReportWriter for FakeRepo {
        fn create_shift_report(&self, report: &NewShiftReport) -> RepositoryResult<ShiftReport> {
            self.report_writer.create_shift_report(report)
        }

        fn replace_shift_report(&self, report: &NewShiftReport) -> RepositoryResult<ShiftReport> {
            self.report_writer.replace_shift_report(report)
        }

        fn delete_shift_report(&self, summary_id: i32, hub_id: i32) -> RepositoryResult<()> {
            self.report_writer.delete_shift_report(summary_id, hub_id)
        }
    }

    #[test]
    fn save_requires_service_role() {
        let repo = FakeRepo::default();
        let user = user_with_roles(&[REPORTS_ACCESS_ROLE]);

        let result = save_shift_report(&repo, &user, form(false));

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn save_creates_report_with_computed_figures() {
        let mut repo = FakeRepo::with_reference(vec![rate(10, 100.0), rate(11, 200.0)]);
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        repo.report_reader
            .expect_find_shift_summary()
            .times(1)
            .returning(|_| Ok(None));
        repo.report_writer.expect_replace_shift_report().never();
        repo.report_writer
            .expect_create_shift_report()
            .times(1)
            .withf(|report| {
                let performance = report.summary.performance;
                report.summary.key.hub_id == HUB
                    && report.summary.shift_pattern == "8h"
                    && (performance.availability - 0.75).abs() < 1e-9
                    && (performance.oee - 0.66825).abs() < 1e-9
                    && report.activities.len() == 3
                    && report.activities[0].activity != ActivityKind::Production
            })
            .returning(|_| {
                Ok(ShiftReport {
                    summary: summary(41),
                    activities: Vec::new(),
                })
            });

        let saved = save_shift_report(&repo, &user, form(false)).expect("saved");

        assert_eq!(saved.summary.id, 41);
    }

    #[test]
    fn save_with_missing_rate_writes_nothing() {
        let mut repo = FakeRepo::with_reference(vec![rate(10, 100.0), rate(11, 0.0)]);
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        repo.report_reader.expect_find_shift_summary().never();
        repo.report_writer.expect_create_shift_report().never();
        repo.report_writer.expect_replace_shift_report().never();

        let result = save_shift_report(&repo, &user, form(false));

        match result {
            Err(ServiceError::Form(message)) => assert!(message.contains("Ibuprofen")),
            other => panic!("expected form error, got {other:?}"),
        }
    }

    #[test]
    fn save_rejects_efficiency_above_one() {
        let mut repo = FakeRepo::with_reference(vec![rate(10, 50.0), rate(11, 200.0)]);
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        repo.report_writer.expect_create_shift_report().never();

        let result = save_shift_report(&repo, &user, form(false));

        match result {
            Err(ServiceError::Form(message)) => assert!(message.contains("L-1")),
            other => panic!("expected form error, got {other:?}"),
        }
    }

    #[test]
    fn save_refuses_existing_report_without_replace() {
        let mut repo = FakeRepo::with_reference(vec![rate(10, 100.0), rate(11, 200.0)]);
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        repo.report_reader
            .expect_find_shift_summary()
            .returning(|_| Ok(Some(summary(5))));
        repo.report_writer.expect_create_shift_report().never();
        repo.report_writer.expect_replace_shift_report().never();

        let result = save_shift_report(&repo, &user, form(false));

        assert!(matches!(result, Err(ServiceError::Conflict)));
    }

    #[test]
    fn save_replaces_existing_report_when_asked() {
        let mut repo = FakeRepo::with_reference(vec![rate(10, 100.0), rate(11, 200.0)]);
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        repo.report_reader
            .expect_find_shift_summary()
            .returning(|_| Ok(Some(summary(5))));
        repo.report_writer.expect_create_shift_report().never();
        repo.report_writer
            .expect_replace_shift_report()
            .times(1)
            .returning(|_| {
                Ok(ShiftReport {
                    summary: summary(6),
                    activities: Vec::new(),
                })
            });

        let saved = save_shift_report(&repo, &user, form(true)).expect("replaced");

        assert_eq!(saved.summary.id, 6);
    }

    #[test]
    fn preview_lists_missing_rates_and_existing_report() {
        let mut repo = FakeRepo::with_reference(vec![rate(10, 100.0)]);
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        repo.report_reader
            .expect_find_shift_summary()
            .returning(|_| Ok(Some(summary(5))));

        let preview = preview_shift_report(&repo, &user, form(false)).expect("preview");

        assert!(!preview.can_save());
        assert!(preview.performance.is_none());
        assert_eq!(preview.problems.len(), 1);
        assert!(preview.problems[0].contains("Ibuprofen"));
        assert_eq!(preview.existing.map(|summary| summary.id), Some(5));
        assert_eq!(preview.machine.name, "Blister 1");
    }

    #[test]
    fn preview_computes_batches() {
        let mut repo = FakeRepo::with_reference(vec![rate(10, 100.0), rate(11, 200.0)]);
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        repo.report_reader
            .expect_find_shift_summary()
            .returning(|_| Ok(None));

        let preview = preview_shift_report(&repo, &user, form(false)).expect("preview");

        assert!(preview.can_save());
        assert_eq!(preview.batches.len(), 2);
        assert_eq!(preview.batches[0].product_name, "Paracetamol");
        assert!((preview.batches[1].efficiency - 0.9).abs() < 1e-9);
        let performance = preview.performance.expect("performance");
        assert!((performance.average_efficiency - 0.9).abs() < 1e-9);
    }

    #[test]
    fn show_report_resolves_names() {
        let mut repo = FakeRepo::with_reference(Vec::new());
        let user = user_with_roles(&[REPORTS_ACCESS_ROLE]);

        repo.report_reader
            .expect_get_shift_report()
            .withf(|id, hub_id| *id == 41 && *hub_id == HUB)
            .returning(|_, _| {
                Ok(Some(ShiftReport {
                    summary: summary(41),
                    activities: vec![ShiftActivity {
                        id: 1,
                        summary_id: 41,
                        hub_id: HUB,
                        report_date: datetime().date(),
                        machine_id: 3,
                        shift: ShiftType::Day,
                        activity: ActivityKind::Production,
                        hours: 3.0,
                        product_id: Some(11),
                        batch_number: Some("L-2".to_string()),
                        quantity: Some(540.0),
                        comment: None,
                        rate: Some(180.0),
                        standard_rate: Some(200.0),
                        efficiency: Some(0.9),
                        created_at: datetime(),
                    }],
                }))
            });

        let page = show_shift_report(&repo, &user, 41).expect("page");

        assert_eq!(page.machine_name, "Blister 1");
        assert_eq!(page.shift_label, "Day");
        assert_eq!(page.activities[0].product_name.as_deref(), Some("Ibuprofen"));
        assert!(page.activities[0].is_production);
    }

    #[test]
    fn show_missing_report_is_not_found() {
        let mut repo = FakeRepo::default();
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        repo.report_reader
            .expect_get_shift_report()
            .returning(|_, _| Ok(None));

        let result = show_shift_report(&repo, &user, 99);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn delete_is_scoped_to_hub() {
        let mut repo = FakeRepo::default();
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        repo.report_writer
            .expect_delete_shift_report()
            .times(1)
            .withf(|id, hub_id| *id == 41 && *hub_id == HUB)
            .returning(|_, _| Ok(()));

        assert!(delete_shift_report(&repo, &user, 41).is_ok());
    }
}
