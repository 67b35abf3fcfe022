use diesel::prelude::*;
use lombok::AllArgsConstructor;

#[derive(Queryable, Selectable, Insertable, AllArgsConstructor, Debug, Clone)]
#[diesel(table_name = crate::database::schema::shopping_carts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ShoppingCart {
    pub user_id: i32,
    pub recipe_id: i32,
}

impl ShoppingCart {
    pub fn exists(user: i32, recipe: i32, connection: &mut PgConnection) -> QueryResult<bool> {
        use crate::database::schema::shopping_carts::dsl::*;
        use diesel::dsl::*;

        let total: i64 = shopping_carts
            .select(count(user_id))
            .filter(user_id.eq(user))
            .filter(recipe_id.eq(recipe))
            .first(connection)?;

        Ok(total > 0)
    }

    // Every (ingredient name, measurement unit, amount) row belonging to a
    // recipe in the user's cart. The explicit ordering keeps the scan order,
    // and with it the first-encountered key order of the aggregation, stable
    // between calls.
    pub fn cart_lines(
        user: i32,
        connection: &mut PgConnection,
    ) -> QueryResult<Vec<(String, String, i32)>> {
        use crate::database::schema::{ingredients, recipes_ingredients, shopping_carts};

        shopping_carts::table
            .inner_join(
                recipes_ingredients::table
                    .on(recipes_ingredients::recipe_id.eq(shopping_carts::recipe_id)),
            )
            .inner_join(
                ingredients::table.on(ingredients::id.eq(recipes_ingredients::ingredient_id)),
            )
            .filter(shopping_carts::user_id.eq(user))
            .select((
                ingredients::name,
                ingredients::measurement_unit,
                recipes_ingredients::amount,
            ))
            .order((
                recipes_ingredients::recipe_id,
                recipes_ingredients::ingredient_id,
            ))
            .load(connection)
    }
}
