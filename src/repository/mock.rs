use mockall::mock;

use super::{
    MachineReader, MachineWriter, ProductReader, ProductWriter, ShiftPatternReader,
    ShiftPatternWriter, ShiftReportReader, ShiftReportWriter, StandardRateReader,
    StandardRateWriter,
};
use crate::domain::{
    machine::{Machine, NewMachine},
    product::{NewProduct, Product},
    shift_pattern::{NewShiftPattern, ShiftPattern},
    shift_report::{
        NewShiftReport, ShiftActivity, ShiftFilter, ShiftReport, ShiftReportKey, ShiftSummary,
        ShiftSummaryListQuery,
    },
    standard_rate::{NewStandardRate, StandardRate},
};
use pushkind_common::repository::errors::RepositoryResult;

mock! {
    pub MachineReader {}

    impl MachineReader for MachineReader {
        fn get_machine_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Machine>>;
        fn list_machines(&self, hub_id: i32) -> RepositoryResult<Vec<Machine>>;
    }
}

mock! {
    pub MachineWriter {}

    impl MachineWriter for MachineWriter {
        fn upsert_machines(&self, new_machines: &[NewMachine]) -> RepositoryResult<usize>;
    }
}

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn list_products(&self, hub_id: i32) -> RepositoryResult<Vec<Product>>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn upsert_products(&self, new_products: &[NewProduct]) -> RepositoryResult<usize>;
    }
}

mock! {
    pub ShiftPatternReader {}

    impl ShiftPatternReader for ShiftPatternReader {
        fn get_shift_pattern_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<ShiftPattern>>;
        fn list_shift_patterns(&self, hub_id: i32) -> RepositoryResult<Vec<ShiftPattern>>;
    }
}

mock! {
    pub ShiftPatternWriter {}

    impl ShiftPatternWriter for ShiftPatternWriter {
        fn upsert_shift_patterns(&self, new_patterns: &[NewShiftPattern]) -> RepositoryResult<usize>;
    }
}

mock! {
    pub StandardRateReader {}

    impl StandardRateReader for StandardRateReader {
        fn list_standard_rates(&self, hub_id: i32) -> RepositoryResult<Vec<StandardRate>>;
        fn list_machine_rates(&self, machine_id: i32, hub_id: i32) -> RepositoryResult<Vec<StandardRate>>;
    }
}

mock! {
    pub StandardRateWriter {}

    impl StandardRateWriter for StandardRateWriter {
        fn upsert_standard_rates(&self, new_rates: &[NewStandardRate]) -> RepositoryResult<usize>;
    }
}

mock! {
    pub ShiftReportReader {}

    impl ShiftReportReader for ShiftReportReader {
        fn find_shift_summary(&self, key: &ShiftReportKey) -> RepositoryResult<Option<ShiftSummary>>;
        fn get_shift_report(&self, summary_id: i32, hub_id: i32) -> RepositoryResult<Option<ShiftReport>>;
        fn list_shift_summaries(&self, query: ShiftSummaryListQuery) -> RepositoryResult<(usize, Vec<ShiftSummary>)>;
        fn list_shift_activities(&self, filter: &ShiftFilter) -> RepositoryResult<Vec<ShiftActivity>>;
    }
}

mock! {
    pub ShiftReportWriter {}

    impl ShiftReportWriter for ShiftReportWriter {
        fn create_shift_report(&self, report: &NewShiftReport) -> RepositoryResult<ShiftReport>;
        fn replace_shift_report(&self, report: &NewShiftReport) -> RepositoryResult<ShiftReport>;
        fn delete_shift_report(&self, summary_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }
}
