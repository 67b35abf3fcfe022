use diesel::prelude::*;
use lombok::AllArgsConstructor;

use super::recipe::Recipe;

#[derive(Queryable, Selectable, AllArgsConstructor, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::database::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl User {
    pub fn by_id(user_id: i32, connection: &mut PgConnection) -> QueryResult<User> {
        use crate::database::schema::users::dsl::*;

        users.find(user_id).first(connection)
    }

    pub fn recipes(&self, connection: &mut PgConnection) -> QueryResult<Vec<Recipe>> {
        use crate::database::schema::recipes::dsl::*;

        recipes
            .filter(author_id.eq(self.id))
            .order(id.desc())
            .load(connection)
    }

    pub fn recipes_count(&self, connection: &mut PgConnection) -> QueryResult<i64> {
        use crate::database::schema::recipes::dsl::*;
        use diesel::dsl::*;

        recipes
            .select(count(id))
            .filter(author_id.eq(self.id))
            .first(connection)
    }
}
