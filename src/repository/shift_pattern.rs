use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::{
    domain::shift_pattern::{
        NewShiftPattern as DomainNewShiftPattern, ShiftPattern as DomainShiftPattern,
    },
    models::shift_pattern::{NewShiftPattern as DbNewShiftPattern, ShiftPattern as DbShiftPattern},
    repository::{DieselRepository, ShiftPatternReader, ShiftPatternWriter},
};

impl ShiftPatternReader for DieselRepository {
    fn get_shift_pattern_by_id(
        &self,
        id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainShiftPattern>> {
        use crate::schema::shift_patterns;

        let mut conn = self.conn()?;
        let pattern = shift_patterns::table
            .filter(shift_patterns::id.eq(id))
            .filter(shift_patterns::hub_id.eq(hub_id))
            .first::<DbShiftPattern>(&mut conn)
            .optional()?;

        Ok(pattern.map(Into::into))
    }

    fn list_shift_patterns(&self, hub_id: i32) -> RepositoryResult<Vec<DomainShiftPattern>> {
        use crate::schema::shift_patterns;

        let mut conn = self.conn()?;
        let items = shift_patterns::table
            .filter(shift_patterns::hub_id.eq(hub_id))
            .order((
                shift_patterns::working_hours.desc(),
                shift_patterns::code.asc(),
            ))
            .load::<DbShiftPattern>(&mut conn)?;

        Ok(items.into_iter().map(Into::into).collect())
    }
}

impl ShiftPatternWriter for DieselRepository {
    fn upsert_shift_patterns(
        &self,
        new_patterns: &[DomainNewShiftPattern],
    ) -> RepositoryResult<usize> {
        use crate::schema::shift_patterns;

        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            let mut affected = 0;
            for pattern in new_patterns {
                let db_new = DbNewShiftPattern::from(pattern);
                affected += diesel::insert_into(shift_patterns::table)
                    .values(&db_new)
                    .on_conflict((shift_patterns::hub_id, shift_patterns::code))
                    .do_update()
                    .set(&db_new)
                    .execute(conn)?;
            }
            Ok::<usize, diesel::result::Error>(affected)
        })
        .map_err(Into::into)
    }
}
