use pushkind_shifts::domain::product::NewProduct;
use pushkind_shifts::domain::shift_report::{ShiftFilter, ShiftSummaryListQuery};
use pushkind_shifts::forms::shift_reports::{BatchRowForm, DowntimeRowForm, ShiftReportForm};
use pushkind_shifts::repository::{ProductReader, ProductWriter, ShiftReportReader};
use pushkind_shifts::services::ServiceError;
use pushkind_shifts::services::shift_reports::{
    delete_shift_report, preview_shift_report, save_shift_report, show_shift_report,
};
use pushkind_shifts::{REPORTS_ACCESS_ROLE, SERVICE_ACCESS_ROLE};

mod common;

fn form(reference: &common::Reference, batch_hours: &str) -> ShiftReportForm {
    ShiftReportForm {
        report_date: "2025-03-14".to_string(),
        machine_id: reference.machine.id.to_string(),
        shift: "day".to_string(),
        shift_pattern_id: reference.full_shift.id.to_string(),
        downtime: vec![DowntimeRowForm {
            kind: "cleaning".to_string(),
            hours: "1,5".to_string(),
            comment: "line wash".to_string(),
        }],
        batches: vec![BatchRowForm {
            product_id: reference.product.id.to_string(),
            batch_number: "L-1".to_string(),
            quantity: "1200".to_string(),
            hours: batch_hours.to_string(),
        }],
        replace_existing: false,
    }
}

fn summary_count(repo: &pushkind_shifts::repository::DieselRepository) -> usize {
    repo.list_shift_summaries(ShiftSummaryListQuery::new(ShiftFilter::new(1)))
        .expect("list summaries")
        .0
}

#[test]
fn saved_report_can_be_shown_replaced_and_deleted() {
    let test_db = common::TestDb::new("service_saved_report_lifecycle.db");
    let repo = test_db.repo();
    let reference = common::seed_reference(&repo, 1);
    let operator = common::user(1, &[SERVICE_ACCESS_ROLE]);
    let viewer = common::user(1, &[REPORTS_ACCESS_ROLE]);

    let saved = save_shift_report(&repo, &operator, form(&reference, "6")).expect("saved");
    assert!((saved.summary.availability - 0.75).abs() < 1e-9);
    assert!((saved.summary.oee - 0.594).abs() < 1e-9);

    let page = show_shift_report(&repo, &viewer, saved.summary.id).expect("shown");
    assert_eq!(page.machine_name, "Blister 1");
    assert_eq!(page.activities.len(), 2);
    assert_eq!(
        page.activities[1].product_name.as_deref(),
        Some("Paracetamol")
    );

    let err = save_shift_report(&repo, &operator, form(&reference, "6.5"))
        .expect_err("duplicate must be refused");
    assert!(matches!(err, ServiceError::Conflict));

    let preview = preview_shift_report(&repo, &operator, form(&reference, "6.5")).expect("preview");
    assert_eq!(
        preview.existing.as_ref().map(|summary| summary.id),
        Some(saved.summary.id)
    );

    let mut replacing = form(&reference, "6.5");
    replacing.replace_existing = true;
    let replaced = save_shift_report(&repo, &operator, replacing).expect("replaced");
    assert_eq!(summary_count(&repo), 1);
    assert_eq!(replaced.summary.production_hours, 6.5);

    let err = delete_shift_report(&repo, &viewer, replaced.summary.id)
        .expect_err("viewers cannot delete");
    assert!(matches!(err, ServiceError::Unauthorized));

    delete_shift_report(&repo, &operator, replaced.summary.id).expect("deleted");
    assert_eq!(summary_count(&repo), 0);
    let err = show_shift_report(&repo, &viewer, replaced.summary.id).expect_err("gone");
    assert!(matches!(err, ServiceError::NotFound));
}

#[test]
fn missing_standard_rate_writes_nothing() {
    let test_db = common::TestDb::new("service_missing_standard_rate.db");
    let repo = test_db.repo();
    let reference = common::seed_reference(&repo, 1);
    repo.upsert_products(&[NewProduct::new(1, "Ibuprofen")])
        .expect("product");
    let unrated = repo
        .list_products(1)
        .expect("products")
        .into_iter()
        .find(|product| product.name == "Ibuprofen")
        .expect("unrated product");
    let operator = common::user(1, &[SERVICE_ACCESS_ROLE]);

    let mut submitted = form(&reference, "3");
    submitted.batches.push(BatchRowForm {
        product_id: unrated.id.to_string(),
        batch_number: "L-2".to_string(),
        quantity: "300".to_string(),
        hours: "3".to_string(),
    });

    let err = save_shift_report(&repo, &operator, submitted).expect_err("rejected");
    match err {
        ServiceError::Form(message) => assert!(message.contains("Ibuprofen")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(summary_count(&repo), 0);
}

#[test]
fn short_shift_is_rejected() {
    let test_db = common::TestDb::new("service_short_shift_is_rejected.db");
    let repo = test_db.repo();
    let reference = common::seed_reference(&repo, 1);
    let operator = common::user(1, &[SERVICE_ACCESS_ROLE]);

    let err = save_shift_report(&repo, &operator, form(&reference, "2")).expect_err("rejected");
    assert!(matches!(err, ServiceError::Form(_)));
    assert_eq!(summary_count(&repo), 0);

    let mut partial = form(&reference, "2");
    partial.batches[0].quantity = "400".to_string();
    partial.shift_pattern_id = reference.partial_shift.id.to_string();
    let saved = save_shift_report(&repo, &operator, partial).expect("partial shift saved");
    assert!((saved.summary.availability - 2.0 / 3.5).abs() < 1e-9);
}
