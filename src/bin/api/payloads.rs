use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::database::models::{
    favorite::Favorite, ingredient::Ingredient, recipe::Recipe, shopping_cart::ShoppingCart,
    subscription::Subscription, tag::Tag, user::User,
};

#[derive(Debug, Serialize)]
pub struct UserOut {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_subscribed: bool,
}

impl UserOut {
    pub fn build(user: &User, viewer: Option<i32>, connection: &mut PgConnection) -> QueryResult<Self> {
        let is_subscribed = match viewer {
            Some(viewer) if viewer != user.id => Subscription::exists(viewer, user.id, connection)?,
            _ => false,
        };

        Ok(Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            is_subscribed,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct TagOut {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl From<Tag> for TagOut {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            color: tag.color,
            slug: tag.slug,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IngredientOut {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientOut {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

// An ingredient line of a recipe: the ingredient plus its amount.
#[derive(Debug, Serialize)]
pub struct RecipeIngredientOut {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl From<(Ingredient, i32)> for RecipeIngredientOut {
    fn from((ingredient, amount): (Ingredient, i32)) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
            amount,
        }
    }
}

// Compact recipe representation used in favorite/cart responses and
// subscription listings.
#[derive(Debug, Serialize)]
pub struct RecipeShortOut {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i32,
}

impl From<&Recipe> for RecipeShortOut {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeOut {
    pub id: i32,
    pub author: UserOut,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: Option<String>,
    pub tags: Vec<TagOut>,
    pub ingredients: Vec<RecipeIngredientOut>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl RecipeOut {
    pub fn build(
        recipe: Recipe,
        viewer: Option<i32>,
        connection: &mut PgConnection,
    ) -> QueryResult<Self> {
        let author = User::by_id(recipe.author_id, connection)?;
        let author = UserOut::build(&author, viewer, connection)?;

        let tags = recipe
            .tags(connection)?
            .into_iter()
            .map(TagOut::from)
            .collect();
        let ingredients = recipe
            .ingredients(connection)?
            .into_iter()
            .map(RecipeIngredientOut::from)
            .collect();

        let (is_favorited, is_in_shopping_cart) = match viewer {
            Some(viewer) => (
                Favorite::exists(viewer, recipe.id, connection)?,
                ShoppingCart::exists(viewer, recipe.id, connection)?,
            ),
            None => (false, false),
        };

        Ok(Self {
            id: recipe.id,
            author,
            name: recipe.name,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
            image: recipe.image,
            tags,
            ingredients,
            is_favorited,
            is_in_shopping_cart,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SubscriptionOut {
    #[serde(flatten)]
    pub user: UserOut,
    pub recipes: Vec<RecipeShortOut>,
    pub recipes_count: i64,
}

impl SubscriptionOut {
    pub fn build(author: &User, viewer: i32, connection: &mut PgConnection) -> QueryResult<Self> {
        let user = UserOut::build(author, Some(viewer), connection)?;
        let recipes = author
            .recipes(connection)?
            .iter()
            .map(RecipeShortOut::from)
            .collect();
        let recipes_count = author.recipes_count(connection)?;

        Ok(Self {
            user,
            recipes,
            recipes_count,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct IngredientAmountIn {
    pub id: i32,
    pub amount: i32,
}

#[derive(Debug, Deserialize)]
pub struct RecipeIn {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<i32>,
    #[serde(default)]
    pub ingredients: Vec<IngredientAmountIn>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    pub image: Option<String>,
    pub tags: Option<Vec<i32>>,
    pub ingredients: Option<Vec<IngredientAmountIn>>,
}
