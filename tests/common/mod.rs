//! Helpers for integration tests.
#![allow(dead_code)]

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_common::db::{DbPool, establish_connection_pool};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_shifts::domain::machine::{Machine, NewMachine};
use pushkind_shifts::domain::product::{NewProduct, Product};
use pushkind_shifts::domain::shift_pattern::{NewShiftPattern, ShiftPattern};
use pushkind_shifts::domain::standard_rate::NewStandardRate;
use pushkind_shifts::repository::{
    DieselRepository, MachineReader, MachineWriter, ProductReader, ProductWriter,
    ShiftPatternReader, ShiftPatternWriter, StandardRateWriter,
};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// SQLite file migrated to the latest schema, removed on drop.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok();

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        for suffix in ["", "-shm", "-wal"] {
            std::fs::remove_file(format!("{}{suffix}", self.filename)).ok();
        }
    }
}

/// Reference rows every report test needs.
pub struct Reference {
    pub machine: Machine,
    pub product: Product,
    pub full_shift: ShiftPattern,
    pub partial_shift: ShiftPattern,
}

/// Seed one machine, one product rated at 250 per hour, an 8 hour pattern
/// and a 4 hour partial pattern for `hub_id`.
pub fn seed_reference(repo: &DieselRepository, hub_id: i32) -> Reference {
    repo.upsert_machines(&[NewMachine::new(hub_id, "Blister 1", "blisters")])
        .expect("seed machine");
    repo.upsert_products(&[NewProduct::new(hub_id, "Paracetamol").with_batch_size(1200.0)])
        .expect("seed product");
    repo.upsert_shift_patterns(&[
        NewShiftPattern::new(hub_id, "8h", 8.0),
        NewShiftPattern::new(hub_id, "partial", 4.0).partial(true),
    ])
    .expect("seed patterns");

    let machine = repo.list_machines(hub_id).expect("machines").remove(0);
    let product = repo.list_products(hub_id).expect("products").remove(0);
    let patterns = repo.list_shift_patterns(hub_id).expect("patterns");
    let full_shift = patterns
        .iter()
        .find(|pattern| !pattern.is_partial)
        .cloned()
        .expect("full pattern");
    let partial_shift = patterns
        .into_iter()
        .find(|pattern| pattern.is_partial)
        .expect("partial pattern");

    repo.upsert_standard_rates(&[NewStandardRate::new(hub_id, product.id, machine.id, 250.0)])
        .expect("seed rate");

    Reference {
        machine,
        product,
        full_shift,
        partial_shift,
    }
}

pub fn user(hub_id: i32, roles: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "operator".into(),
        email: "operator@example.com".into(),
        hub_id,
        name: "Operator".into(),
        roles: roles.iter().map(|role| role.to_string()).collect(),
        exp: 0,
    }
}
