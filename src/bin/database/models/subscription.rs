use diesel::prelude::*;
use lombok::AllArgsConstructor;

use super::user::User;

#[derive(Queryable, Selectable, Insertable, AllArgsConstructor, Debug, Clone)]
#[diesel(table_name = crate::database::schema::subscriptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Subscription {
    pub user_id: i32,
    pub author_id: i32,
}

impl Subscription {
    pub fn exists(user: i32, author: i32, connection: &mut PgConnection) -> QueryResult<bool> {
        use crate::database::schema::subscriptions::dsl::*;
        use diesel::dsl::*;

        let total: i64 = subscriptions
            .select(count(user_id))
            .filter(user_id.eq(user))
            .filter(author_id.eq(author))
            .first(connection)?;

        Ok(total > 0)
    }

    // Authors the user is subscribed to, oldest subscription first.
    pub fn authors_of(user: i32, connection: &mut PgConnection) -> QueryResult<Vec<User>> {
        use crate::database::schema::{subscriptions, users};

        subscriptions::table
            .inner_join(users::table.on(users::id.eq(subscriptions::author_id)))
            .filter(subscriptions::user_id.eq(user))
            .select(User::as_select())
            .order(subscriptions::author_id)
            .load(connection)
    }
}
