use diesel::prelude::*;
use lombok::AllArgsConstructor;

use super::{ingredient::Ingredient, tag::Tag};

#[derive(Queryable, Selectable, AllArgsConstructor, Debug, Clone)]
#[diesel(table_name = crate::database::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    pub id: i32,
    pub author_id: i32,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: Option<String>,
}

#[derive(Insertable, AllArgsConstructor, Debug)]
#[diesel(table_name = crate::database::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewRecipe {
    pub author_id: i32,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: Option<String>,
}

// PATCH payload: absent fields keep their stored values.
#[derive(AsChangeset, AllArgsConstructor, Debug)]
#[diesel(table_name = crate::database::schema::recipes)]
pub struct RecipeChanges {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    pub image: Option<String>,
}

impl RecipeChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.text.is_none()
            && self.cooking_time.is_none()
            && self.image.is_none()
    }
}

impl Recipe {
    pub fn by_id(recipe_id: i32, connection: &mut PgConnection) -> QueryResult<Recipe> {
        use crate::database::schema::recipes::dsl::*;

        recipes.find(recipe_id).first(connection)
    }

    pub fn tags(&self, connection: &mut PgConnection) -> QueryResult<Vec<Tag>> {
        use crate::database::schema::{recipes_tags, tags};

        recipes_tags::table
            .inner_join(tags::table)
            .filter(recipes_tags::recipe_id.eq(self.id))
            .select(Tag::as_select())
            .order(tags::id)
            .load(connection)
    }

    // Every ingredient line of the recipe with its amount.
    pub fn ingredients(
        &self,
        connection: &mut PgConnection,
    ) -> QueryResult<Vec<(Ingredient, i32)>> {
        use crate::database::schema::{ingredients, recipes_ingredients};

        recipes_ingredients::table
            .inner_join(ingredients::table)
            .filter(recipes_ingredients::recipe_id.eq(self.id))
            .select((Ingredient::as_select(), recipes_ingredients::amount))
            .order(recipes_ingredients::ingredient_id)
            .load(connection)
    }
}
