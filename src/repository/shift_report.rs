use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::shift::UnknownCode,
    domain::shift_report::{
        NewShiftReport as DomainNewShiftReport, ShiftActivity as DomainShiftActivity,
        ShiftFilter, ShiftReport as DomainShiftReport, ShiftReportKey,
        ShiftSummary as DomainShiftSummary, ShiftSummaryListQuery,
    },
    models::shift_report::{
        NewShiftActivity as DbNewShiftActivity, NewShiftSummary as DbNewShiftSummary,
        ShiftActivity as DbShiftActivity, ShiftSummary as DbShiftSummary,
    },
    repository::{DieselRepository, ShiftReportReader, ShiftReportWriter},
};

/// Stored codes that no longer parse surface as deserialization errors.
fn decode<T, U>(row: T) -> QueryResult<U>
where
    U: TryFrom<T, Error = UnknownCode>,
{
    U::try_from(row).map_err(|err| diesel::result::Error::DeserializationError(Box::new(err)))
}

fn decode_all<T, U>(rows: Vec<T>) -> QueryResult<Vec<U>>
where
    U: TryFrom<T, Error = UnknownCode>,
{
    rows.into_iter().map(decode).collect()
}

fn load_activities(
    conn: &mut SqliteConnection,
    summary_id: i32,
) -> QueryResult<Vec<DomainShiftActivity>> {
    use crate::schema::shift_activities;

    let rows = shift_activities::table
        .filter(shift_activities::summary_id.eq(summary_id))
        .order(shift_activities::id.asc())
        .load::<DbShiftActivity>(conn)?;

    decode_all(rows)
}

fn insert_report(
    conn: &mut SqliteConnection,
    report: &DomainNewShiftReport,
) -> QueryResult<DomainShiftReport> {
    use crate::schema::{shift_activities, shift_summaries};

    let summary = diesel::insert_into(shift_summaries::table)
        .values(&DbNewShiftSummary::from(&report.summary))
        .get_result::<DbShiftSummary>(conn)?;

    let mut activities = Vec::with_capacity(report.activities.len());
    for activity in &report.activities {
        let row = diesel::insert_into(shift_activities::table)
            .values(&DbNewShiftActivity::for_summary(&summary, activity))
            .get_result::<DbShiftActivity>(conn)?;
        activities.push(decode(row)?);
    }

    Ok(DomainShiftReport {
        summary: decode(summary)?,
        activities,
    })
}

fn delete_by_ids(conn: &mut SqliteConnection, summary_ids: &[i32]) -> QueryResult<usize> {
    use crate::schema::{shift_activities, shift_summaries};

    if summary_ids.is_empty() {
        return Ok(0);
    }

    diesel::delete(shift_activities::table.filter(shift_activities::summary_id.eq_any(summary_ids)))
        .execute(conn)?;
    diesel::delete(shift_summaries::table.filter(shift_summaries::id.eq_any(summary_ids)))
        .execute(conn)
}

fn summary_ids_for_key(conn: &mut SqliteConnection, key: &ShiftReportKey) -> QueryResult<Vec<i32>> {
    use crate::schema::shift_summaries;

    shift_summaries::table
        .filter(shift_summaries::hub_id.eq(key.hub_id))
        .filter(shift_summaries::report_date.eq(key.report_date))
        .filter(shift_summaries::machine_id.eq(key.machine_id))
        .filter(shift_summaries::shift.eq(key.shift.as_str()))
        .select(shift_summaries::id)
        .load::<i32>(conn)
}

impl ShiftReportReader for DieselRepository {
    fn find_shift_summary(
        &self,
        key: &ShiftReportKey,
    ) -> RepositoryResult<Option<DomainShiftSummary>> {
        use crate::schema::shift_summaries;

        let mut conn = self.conn()?;
        let summary = shift_summaries::table
            .filter(shift_summaries::hub_id.eq(key.hub_id))
            .filter(shift_summaries::report_date.eq(key.report_date))
            .filter(shift_summaries::machine_id.eq(key.machine_id))
            .filter(shift_summaries::shift.eq(key.shift.as_str()))
            .first::<DbShiftSummary>(&mut conn)
            .optional()?;

        Ok(summary.map(decode).transpose()?)
    }

    fn get_shift_report(
        &self,
        summary_id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainShiftReport>> {
        use crate::schema::shift_summaries;

        let mut conn = self.conn()?;
        let summary = shift_summaries::table
            .filter(shift_summaries::id.eq(summary_id))
            .filter(shift_summaries::hub_id.eq(hub_id))
            .first::<DbShiftSummary>(&mut conn)
            .optional()?;

        let Some(summary) = summary else {
            return Ok(None);
        };

        let activities = load_activities(&mut conn, summary.id)?;

        Ok(Some(DomainShiftReport {
            summary: decode(summary)?,
            activities,
        }))
    }

    fn list_shift_summaries(
        &self,
        query: ShiftSummaryListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainShiftSummary>)> {
        use crate::schema::shift_summaries;

        let mut conn = self.conn()?;

        let ShiftSummaryListQuery { filter, pagination } = query;

        let query_builder = || {
            let mut items = shift_summaries::table
                .filter(shift_summaries::hub_id.eq(filter.hub_id))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(from) = filter.date_from {
                items = items.filter(shift_summaries::report_date.ge(from));
            }
            if let Some(to) = filter.date_to {
                items = items.filter(shift_summaries::report_date.le(to));
            }
            if let Some(shift) = filter.shift {
                items = items.filter(shift_summaries::shift.eq(shift.as_str()));
            }
            if !filter.machine_ids.is_empty() {
                items = items.filter(shift_summaries::machine_id.eq_any(filter.machine_ids.clone()));
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order((
            shift_summaries::report_date.desc(),
            shift_summaries::machine_id.asc(),
            shift_summaries::shift.asc(),
        ));

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let rows = items.load::<DbShiftSummary>(&mut conn)?;

        Ok((total, decode_all(rows)?))
    }

    fn list_shift_activities(
        &self,
        filter: &ShiftFilter,
    ) -> RepositoryResult<Vec<DomainShiftActivity>> {
        use crate::schema::shift_activities;

        let mut conn = self.conn()?;

        let mut items = shift_activities::table
            .filter(shift_activities::hub_id.eq(filter.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(from) = filter.date_from {
            items = items.filter(shift_activities::report_date.ge(from));
        }
        if let Some(to) = filter.date_to {
            items = items.filter(shift_activities::report_date.le(to));
        }
        if let Some(shift) = filter.shift {
            items = items.filter(shift_activities::shift.eq(shift.as_str()));
        }
        if !filter.machine_ids.is_empty() {
            items = items.filter(shift_activities::machine_id.eq_any(filter.machine_ids.clone()));
        }

        let rows = items
            .order((
                shift_activities::report_date.asc(),
                shift_activities::machine_id.asc(),
                shift_activities::id.asc(),
            ))
            .load::<DbShiftActivity>(&mut conn)?;

        Ok(decode_all(rows)?)
    }
}

impl ShiftReportWriter for DieselRepository {
    fn create_shift_report(
        &self,
        report: &DomainNewShiftReport,
    ) -> RepositoryResult<DomainShiftReport> {
        let mut conn = self.conn()?;
        conn.transaction(|conn| insert_report(conn, report))
            .map_err(Into::into)
    }

    fn replace_shift_report(
        &self,
        report: &DomainNewShiftReport,
    ) -> RepositoryResult<DomainShiftReport> {
        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            let existing = summary_ids_for_key(conn, &report.summary.key)?;
            delete_by_ids(conn, &existing)?;
            insert_report(conn, report)
        })
        .map_err(Into::into)
    }

    fn delete_shift_report(&self, summary_id: i32, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::shift_summaries;

        let mut conn = self.conn()?;
        conn.transaction::<_, RepositoryError, _>(|conn| {
            let owned = shift_summaries::table
                .filter(shift_summaries::id.eq(summary_id))
                .filter(shift_summaries::hub_id.eq(hub_id))
                .select(shift_summaries::id)
                .load::<i32>(conn)?;

            if delete_by_ids(conn, &owned)? == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}
