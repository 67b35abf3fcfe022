use diesel::prelude::*;
use lombok::AllArgsConstructor;

use super::user::User;

#[derive(Queryable, Selectable, Insertable, AllArgsConstructor, Debug, Clone)]
#[diesel(table_name = crate::database::schema::auth_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AuthToken {
    pub key: String,
    pub user_id: i32,
}

impl AuthToken {
    pub fn resolve(token: &str, connection: &mut PgConnection) -> QueryResult<Option<User>> {
        use crate::database::schema::{auth_tokens, users};

        auth_tokens::table
            .inner_join(users::table)
            .filter(auth_tokens::key.eq(token))
            .select(User::as_select())
            .first(connection)
            .optional()
    }
}
