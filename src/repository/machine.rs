use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::{
    domain::machine::{Machine as DomainMachine, NewMachine as DomainNewMachine},
    models::machine::{Machine as DbMachine, NewMachine as DbNewMachine},
    repository::{DieselRepository, MachineReader, MachineWriter},
};

impl MachineReader for DieselRepository {
    fn get_machine_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainMachine>> {
        use crate::schema::machines;

        let mut conn = self.conn()?;
        let machine = machines::table
            .filter(machines::id.eq(id))
            .filter(machines::hub_id.eq(hub_id))
            .first::<DbMachine>(&mut conn)
            .optional()?;

        Ok(machine.map(Into::into))
    }

    fn list_machines(&self, hub_id: i32) -> RepositoryResult<Vec<DomainMachine>> {
        use crate::schema::machines;

        let mut conn = self.conn()?;
        let items = machines::table
            .filter(machines::hub_id.eq(hub_id))
            .order(machines::name.asc())
            .load::<DbMachine>(&mut conn)?;

        Ok(items.into_iter().map(Into::into).collect())
    }
}

impl MachineWriter for DieselRepository {
    fn upsert_machines(&self, new_machines: &[DomainNewMachine]) -> RepositoryResult<usize> {
        use crate::schema::machines;

        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            let mut affected = 0;
            for machine in new_machines {
                let db_new = DbNewMachine::from(machine);
                affected += diesel::insert_into(machines::table)
                    .values(&db_new)
                    .on_conflict((machines::hub_id, machines::name))
                    .do_update()
                    .set(&db_new)
                    .execute(conn)?;
            }
            Ok::<usize, diesel::result::Error>(affected)
        })
        .map_err(Into::into)
    }
}
