use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::{
    domain::product::{NewProduct as DomainNewProduct, Product as DomainProduct},
    models::product::{NewProduct as DbNewProduct, Product as DbProduct},
    repository::{DieselRepository, ProductReader, ProductWriter},
};

impl ProductReader for DieselRepository {
    fn list_products(&self, hub_id: i32) -> RepositoryResult<Vec<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let items = products::table
            .filter(products::hub_id.eq(hub_id))
            .order(products::name.asc())
            .load::<DbProduct>(&mut conn)?;

        Ok(items.into_iter().map(Into::into).collect())
    }
}

impl ProductWriter for DieselRepository {
    fn upsert_products(&self, new_products: &[DomainNewProduct]) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            let mut affected = 0;
            for product in new_products {
                let db_new = DbNewProduct::from(product);
                affected += diesel::insert_into(products::table)
                    .values(&db_new)
                    .on_conflict((products::hub_id, products::name))
                    .do_update()
                    .set(&db_new)
                    .execute(conn)?;
            }
            Ok::<usize, diesel::result::Error>(affected)
        })
        .map_err(Into::into)
    }
}
