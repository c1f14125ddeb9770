use std::collections::HashMap;

use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Serialize;

use crate::domain::machine::Machine;
use crate::domain::product::Product;
use crate::domain::shift_pattern::ShiftPattern;
use crate::domain::standard_rate::NewStandardRate;
use crate::forms::reference::{
    NamedStandardRate, UploadMachinesForm, UploadProductsForm, UploadShiftPatternsForm,
    UploadStandardRatesForm,
};
use crate::repository::{
    MachineReader, MachineWriter, ProductReader, ProductWriter, ShiftPatternReader,
    ShiftPatternWriter, StandardRateReader, StandardRateWriter,
};
use crate::services::{ServiceError, ServiceResult, ensure_any_role};
use crate::{ADMIN_ACCESS_ROLE, SERVICE_ACCESS_ROLE};

/// Data required to render the reference data page.
pub struct ReferencePageData {
    pub machines: Vec<Machine>,
    pub products: Vec<Product>,
    pub shift_patterns: Vec<ShiftPattern>,
    pub standard_rates: Vec<StandardRateView>,
    /// Whether the upload forms should be offered.
    pub can_import: bool,
}

#[derive(Debug, Serialize)]
pub struct StandardRateView {
    pub product_name: String,
    pub machine_name: String,
    pub standard_rate: f64,
    pub is_usable: bool,
}

/// Loads every reference table of the user's hub.
pub fn load_reference_page<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<ReferencePageData>
where
    R: MachineReader + ProductReader + ShiftPatternReader + StandardRateReader + ?Sized,
{
    ensure_any_role(user, &[SERVICE_ACCESS_ROLE, ADMIN_ACCESS_ROLE])?;

    let machines = repo.list_machines(user.hub_id)?;
    let products = repo.list_products(user.hub_id)?;
    let shift_patterns = repo.list_shift_patterns(user.hub_id)?;

    let machine_names: HashMap<i32, &str> = machines
        .iter()
        .map(|machine| (machine.id, machine.name.as_str()))
        .collect();
    let product_names: HashMap<i32, &str> = products
        .iter()
        .map(|product| (product.id, product.name.as_str()))
        .collect();

    let standard_rates = repo
        .list_standard_rates(user.hub_id)?
        .into_iter()
        .map(|rate| StandardRateView {
            product_name: product_names
                .get(&rate.product_id)
                .map(|name| name.to_string())
                .unwrap_or_else(|| format!("#{}", rate.product_id)),
            machine_name: machine_names
                .get(&rate.machine_id)
                .map(|name| name.to_string())
                .unwrap_or_else(|| format!("#{}", rate.machine_id)),
            standard_rate: rate.standard_rate,
            is_usable: rate.is_usable(),
        })
        .collect();

    Ok(ReferencePageData {
        can_import: ensure_any_role(user, &[ADMIN_ACCESS_ROLE]).is_ok(),
        machines,
        products,
        shift_patterns,
        standard_rates,
    })
}

/// Upserts machines from an uploaded CSV file.
pub fn import_machines<R>(
    repo: &R,
    user: &AuthenticatedUser,
    mut form: UploadMachinesForm,
) -> ServiceResult<usize>
where
    R: MachineWriter + ?Sized,
{
    ensure_any_role(user, &[ADMIN_ACCESS_ROLE])?;

    let machines = form
        .into_new_machines(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let count = repo.upsert_machines(&machines)?;
    log::info!("Imported {count} machines for hub {}", user.hub_id);
    Ok(count)
}

/// Upserts products from an uploaded CSV file.
pub fn import_products<R>(
    repo: &R,
    user: &AuthenticatedUser,
    mut form: UploadProductsForm,
) -> ServiceResult<usize>
where
    R: ProductWriter + ?Sized,
{
    ensure_any_role(user, &[ADMIN_ACCESS_ROLE])?;

    let products = form
        .into_new_products(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let count = repo.upsert_products(&products)?;
    log::info!("Imported {count} products for hub {}", user.hub_id);
    Ok(count)
}

/// Upserts shift patterns from an uploaded CSV file.
pub fn import_shift_patterns<R>(
    repo: &R,
    user: &AuthenticatedUser,
    mut form: UploadShiftPatternsForm,
) -> ServiceResult<usize>
where
    R: ShiftPatternWriter + ?Sized,
{
    ensure_any_role(user, &[ADMIN_ACCESS_ROLE])?;

    let patterns = form
        .into_new_shift_patterns(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let count = repo.upsert_shift_patterns(&patterns)?;
    log::info!("Imported {count} shift patterns for hub {}", user.hub_id);
    Ok(count)
}

/// Upserts standard rates from an uploaded CSV file.
///
/// Products and machines are matched by name within the hub. Any unknown
/// name rejects the whole upload.
pub fn import_standard_rates<R>(
    repo: &R,
    user: &AuthenticatedUser,
    mut form: UploadStandardRatesForm,
) -> ServiceResult<usize>
where
    R: MachineReader + ProductReader + StandardRateWriter + ?Sized,
{
    ensure_any_role(user, &[ADMIN_ACCESS_ROLE])?;

    let named = form
        .into_named_rates()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let machines = repo.list_machines(user.hub_id)?;
    let products = repo.list_products(user.hub_id)?;
    let rates = resolve_rates(user.hub_id, named, &machines, &products)?;

    let count = repo.upsert_standard_rates(&rates)?;
    log::info!("Imported {count} standard rates for hub {}", user.hub_id);
    Ok(count)
}

fn resolve_rates(
    hub_id: i32,
    named: Vec<NamedStandardRate>,
    machines: &[Machine],
    products: &[Product],
) -> ServiceResult<Vec<NewStandardRate>> {
    let machine_ids: HashMap<&str, i32> = machines
        .iter()
        .map(|machine| (machine.name.as_str(), machine.id))
        .collect();
    let product_ids: HashMap<&str, i32> = products
        .iter()
        .map(|product| (product.name.as_str(), product.id))
        .collect();

    named
        .into_iter()
        .map(|rate| -> ServiceResult<NewStandardRate> {
            let product_id = product_ids.get(rate.product.as_str()).copied().ok_or_else(|| {
                ServiceError::Form(format!("row {}: unknown product `{}`", rate.row, rate.product))
            })?;
            let machine_id = machine_ids.get(rate.machine.as_str()).copied().ok_or_else(|| {
                ServiceError::Form(format!("row {}: unknown machine `{}`", rate.row, rate.machine))
            })?;
            Ok(NewStandardRate::new(
                hub_id,
                product_id,
                machine_id,
                rate.standard_rate,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, SeekFrom, Write};

    use actix_multipart::form::tempfile::TempFile;
    use chrono::NaiveDateTime;
    use pushkind_common::repository::errors::RepositoryResult;
    use tempfile::NamedTempFile;

    use crate::domain::machine::NewMachine;
    use crate::repository::mock::{
        MockMachineReader, MockMachineWriter, MockProductReader, MockStandardRateWriter,
    };

    fn user_with_roles(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "admin".to_string(),
            email: "admin@example.com".to_string(),
            hub_id: 2,
            name: "Admin".to_string(),
            roles: roles.iter().map(|role| (*role).to_string()).collect(),
            exp: 0,
        }
    }

    fn temp_csv(csv: &str) -> TempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(csv.as_bytes()).expect("write csv file");
        file.as_file_mut()
            .seek(SeekFrom::Start(0))
            .expect("seek to start");

        TempFile {
            file,
            content_type: None,
            file_name: Some("upload.csv".to_string()),
            size: csv.len(),
        }
    }

    fn machine(id: i32, name: &str) -> Machine {
        Machine {
            id,
            hub_id: 2,
            name: name.to_string(),
            qty_uom: "pcs".to_string(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn product(id: i32, name: &str) -> Product {
        Product {
            id,
            hub_id: 2,
            name: name.to_string(),
            batch_size: 1.0,
            units_per_box: 1.0,
            primary_units_per_box: 1.0,
            oracle_code: None,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn import_machines_requires_admin_role() {
        let repo = MockMachineWriter::new();
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);
        let form = UploadMachinesForm {
            csv: temp_csv("name,qty_uom\nBlister 1,blisters\n"),
        };

        let result = import_machines(&repo, &user, form);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn import_machines_upserts_rows() {
        let mut repo = MockMachineWriter::new();
        let user = user_with_roles(&[ADMIN_ACCESS_ROLE]);
        let form = UploadMachinesForm {
            csv: temp_csv("name,qty_uom\nBlister 1,blisters\nPress 2,tablets\n"),
        };

        repo.expect_upsert_machines()
            .times(1)
            .withf(|machines: &[NewMachine]| {
                machines.len() == 2 && machines.iter().all(|machine| machine.hub_id == 2)
            })
            .returning(|machines| Ok(machines.len()));

        let count = import_machines(&repo, &user, form).expect("imported");

        assert_eq!(count, 2);
    }

    #[test]
    fn import_standard_rates_resolves_names() {
        let mut repo = FakeRepo::default();
        let user = user_with_roles(&[ADMIN_ACCESS_ROLE]);
        let form = UploadStandardRatesForm {
            csv: temp_csv("product,machine,standard_rate\nParacetamol,Blister 1,1200\n"),
        };

        repo.machine_reader
            .expect_list_machines()
            .returning(|_| Ok(vec![machine(3, "Blister 1")]));
        repo.product_reader
            .expect_list_products()
            .returning(|_| Ok(vec![product(10, "Paracetamol")]));
        repo.rate_writer
            .expect_upsert_standard_rates()
            .times(1)
            .withf(|rates: &[NewStandardRate]| {
                rates.len() == 1
                    && rates[0].product_id == 10
                    && rates[0].machine_id == 3
                    && (rates[0].standard_rate - 1200.0).abs() < 1e-9
            })
            .returning(|rates| Ok(rates.len()));

        let count = import_standard_rates(&repo, &user, form).expect("imported");

        assert_eq!(count, 1);
    }

    #[test]
    fn import_standard_rates_rejects_unknown_machine() {
        let mut repo = FakeRepo::default();
        let user = user_with_roles(&[ADMIN_ACCESS_ROLE]);
        let form = UploadStandardRatesForm {
            csv: temp_csv("product,machine,standard_rate\nParacetamol,Blister 9,1200\n"),
        };

        repo.machine_reader
            .expect_list_machines()
            .returning(|_| Ok(vec![machine(3, "Blister 1")]));
        repo.product_reader
            .expect_list_products()
            .returning(|_| Ok(vec![product(10, "Paracetamol")]));
        repo.rate_writer.expect_upsert_standard_rates().never();

        let result = import_standard_rates(&repo, &user, form);

        match result {
            Err(ServiceError::Form(message)) => assert!(message.contains("Blister 9")),
            other => panic!("expected form error, got {other:?}"),
        }
    }

    #[derive(Default)]
    struct FakeRepo {
        machine_reader: MockMachineReader,
        product_reader: MockProductReader,
        rate_writer: MockStandardRateWriter,
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

    impl StandardRateWriter for FakeRepo {
        fn upsert_standard_rates(&self, new_rates: &[NewStandardRate]) -> RepositoryResult<usize> {
            self.rate_writer.upsert_standard_rates(new_rates)
        }
    }
}
