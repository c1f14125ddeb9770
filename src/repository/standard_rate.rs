use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::{
    domain::standard_rate::{
        NewStandardRate as DomainNewStandardRate, StandardRate as DomainStandardRate,
    },
    models::standard_rate::{NewStandardRate as DbNewStandardRate, StandardRate as DbStandardRate},
    repository::{DieselRepository, StandardRateReader, StandardRateWriter},
};

impl StandardRateReader for DieselRepository {
    fn list_standard_rates(&self, hub_id: i32) -> RepositoryResult<Vec<DomainStandardRate>> {
        use crate::schema::standard_rates;

        let mut conn = self.conn()?;
        let items = standard_rates::table
            .filter(standard_rates::hub_id.eq(hub_id))
            .order((
                standard_rates::product_id.asc(),
                standard_rates::machine_id.asc(),
            ))
            .load::<DbStandardRate>(&mut conn)?;

        Ok(items.into_iter().map(Into::into).collect())
    }

    fn list_machine_rates(
        &self,
        machine_id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Vec<DomainStandardRate>> {
        use crate::schema::standard_rates;

        let mut conn = self.conn()?;
        let items = standard_rates::table
            .filter(standard_rates::hub_id.eq(hub_id))
            .filter(standard_rates::machine_id.eq(machine_id))
            .load::<DbStandardRate>(&mut conn)?;

        Ok(items.into_iter().map(Into::into).collect())
    }
}

impl StandardRateWriter for DieselRepository {
    fn upsert_standard_rates(&self, new_rates: &[DomainNewStandardRate]) -> RepositoryResult<usize> {
        use crate::schema::standard_rates;

        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            let mut affected = 0;
            for rate in new_rates {
                let db_new = DbNewStandardRate::from(rate);
                affected += diesel::insert_into(standard_rates::table)
                    .values(&db_new)
                    .on_conflict((standard_rates::product_id, standard_rates::machine_id))
                    .do_update()
                    .set((
                        standard_rates::standard_rate.eq(db_new.standard_rate),
                        standard_rates::updated_at.eq(db_new.updated_at),
                    ))
                    .execute(conn)?;
            }
            Ok::<usize, diesel::result::Error>(affected)
        })
        .map_err(Into::into)
    }
}
