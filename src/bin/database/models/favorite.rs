use diesel::prelude::*;
use lombok::AllArgsConstructor;

#[derive(Queryable, Selectable, Insertable, AllArgsConstructor, Debug, Clone)]
#[diesel(table_name = crate::database::schema::favorites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Favorite {
    pub user_id: i32,
    pub recipe_id: i32,
}

impl Favorite {
    pub fn exists(user: i32, recipe: i32, connection: &mut PgConnection) -> QueryResult<bool> {
        use crate::database::schema::favorites::dsl::*;
        use diesel::dsl::*;

        let total: i64 = favorites
            .select(count(user_id))
            .filter(user_id.eq(user))
            .filter(recipe_id.eq(recipe))
            .first(connection)?;

        Ok(total > 0)
    }
}
