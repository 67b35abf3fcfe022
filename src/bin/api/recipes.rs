use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use super::{
    auth::{AuthUser, MaybeUser},
    error::ApiError,
    filters::RecipeFilters,
    pagination::{Page, PageQuery},
    payloads::{IngredientAmountIn, RecipeIn, RecipeOut, RecipePatch, RecipeShortOut},
};
use crate::{
    database::models::{
        favorite::Favorite,
        recipe::{NewRecipe, Recipe, RecipeChanges},
        recipe_ingredient::RecipeIngredient,
        recipe_tag::RecipeTag,
        shopping_cart::ShoppingCart,
    },
    shopping_list::export_shopping_list,
    state::AppState,
};

fn filtered_recipes(
    filters: &RecipeFilters,
    viewer: Option<i32>,
) -> crate::database::schema::recipes::BoxedQuery<'static, diesel::pg::Pg> {
    use crate::database::schema::{favorites, recipes, recipes_tags, shopping_carts, tags};

    let mut query = recipes::table.into_boxed();

    if let Some(author) = filters.author {
        query = query.filter(recipes::author_id.eq(author));
    }

    if !filters.tags.is_empty() {
        let tagged = recipes_tags::table
            .inner_join(tags::table)
            .filter(tags::slug.eq_any(filters.tags.clone()))
            .select(recipes_tags::recipe_id);
        query = query.filter(recipes::id.eq_any(tagged));
    }

    // Viewer-dependent filters are ignored for anonymous callers.
    if let Some(viewer) = viewer {
        if filters.is_favorited {
            let favorited = favorites::table
                .filter(favorites::user_id.eq(viewer))
                .select(favorites::recipe_id);
            query = query.filter(recipes::id.eq_any(favorited));
        }

        if filters.is_in_shopping_cart {
            let in_cart = shopping_carts::table
                .filter(shopping_carts::user_id.eq(viewer))
                .select(shopping_carts::recipe_id);
            query = query.filter(recipes::id.eq_any(in_cart));
        }
    }

    query
}

fn validate_cooking_time(cooking_time: i32) -> Result<(), ApiError> {
    if cooking_time < 1 {
        return Err(ApiError::BadRequest(
            "Cooking time must be at least 1 minute.".to_owned(),
        ));
    }

    Ok(())
}

fn validate_ingredients(ingredients: &[IngredientAmountIn]) -> Result<(), ApiError> {
    if ingredients.is_empty() {
        return Err(ApiError::BadRequest(
            "A recipe needs at least one ingredient.".to_owned(),
        ));
    }

    if ingredients.iter().any(|line| line.amount < 1) {
        return Err(ApiError::BadRequest(
            "Ingredient amounts must be positive.".to_owned(),
        ));
    }

    Ok(())
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    MaybeUser(viewer): MaybeUser,
    Query(page): Query<PageQuery>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page<RecipeOut>>, ApiError> {
    use crate::database::schema::recipes;

    let filters = RecipeFilters::from_params(&params);
    let viewer = viewer.map(|user| user.id);

    let payload = state
        .db(move |connection| {
            let count: i64 = filtered_recipes(&filters, viewer)
                .count()
                .get_result(connection)?;

            let rows: Vec<Recipe> = filtered_recipes(&filters, viewer)
                .order(recipes::id.desc())
                .limit(page.limit())
                .offset(page.offset())
                .load(connection)?;

            let results = rows
                .into_iter()
                .map(|recipe| RecipeOut::build(recipe, viewer, connection))
                .collect::<QueryResult<Vec<_>>>()?;

            Ok(Page { count, results })
        })
        .await?;

    Ok(Json(payload))
}

pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    MaybeUser(viewer): MaybeUser,
    Path(recipe_id): Path<i32>,
) -> Result<Json<RecipeOut>, ApiError> {
    let viewer = viewer.map(|user| user.id);

    let payload = state
        .db(move |connection| {
            let recipe = Recipe::by_id(recipe_id, connection)?;
            RecipeOut::build(recipe, viewer, connection).map_err(ApiError::from)
        })
        .await?;

    Ok(Json(payload))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    AuthUser(viewer): AuthUser,
    Json(payload): Json<RecipeIn>,
) -> Result<(StatusCode, Json<RecipeOut>), ApiError> {
    validate_cooking_time(payload.cooking_time)?;
    validate_ingredients(&payload.ingredients)?;

    let response = state
        .db(move |connection| {
            use crate::database::schema::{recipes, recipes_ingredients, recipes_tags};

            connection.build_transaction().run(|connection| {
                let recipe: Recipe = diesel::insert_into(recipes::table)
                    .values(&NewRecipe::new(
                        viewer.id,
                        payload.name,
                        payload.text,
                        payload.cooking_time,
                        payload.image,
                    ))
                    .get_result(connection)?;

                let tag_rows: Vec<RecipeTag> = payload
                    .tags
                    .iter()
                    .map(|tag_id| RecipeTag::new(recipe.id, *tag_id))
                    .collect();
                diesel::insert_into(recipes_tags::table)
                    .values(&tag_rows)
                    .execute(connection)?;

                let ingredient_rows: Vec<RecipeIngredient> = payload
                    .ingredients
                    .iter()
                    .map(|line| RecipeIngredient::new(recipe.id, line.id, line.amount))
                    .collect();
                diesel::insert_into(recipes_ingredients::table)
                    .values(&ingredient_rows)
                    .execute(connection)?;

                RecipeOut::build(recipe, Some(viewer.id), connection).map_err(ApiError::from)
            })
        })
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    AuthUser(viewer): AuthUser,
    Path(recipe_id): Path<i32>,
    Json(payload): Json<RecipePatch>,
) -> Result<Json<RecipeOut>, ApiError> {
    if let Some(cooking_time) = payload.cooking_time {
        validate_cooking_time(cooking_time)?;
    }
    if let Some(ref ingredients) = payload.ingredients {
        validate_ingredients(ingredients)?;
    }

    let response = state
        .db(move |connection| {
            use crate::database::schema::{recipes, recipes_ingredients, recipes_tags};

            let recipe = Recipe::by_id(recipe_id, connection)?;
            if recipe.author_id != viewer.id {
                return Err(ApiError::Forbidden);
            }

            connection.build_transaction().run(|connection| {
                let changes = RecipeChanges::new(
                    payload.name,
                    payload.text,
                    payload.cooking_time,
                    payload.image,
                );
                if !changes.is_empty() {
                    diesel::update(recipes::table.find(recipe.id))
                        .set(&changes)
                        .execute(connection)?;
                }

                if let Some(tag_ids) = payload.tags {
                    diesel::delete(
                        recipes_tags::table.filter(recipes_tags::recipe_id.eq(recipe.id)),
                    )
                    .execute(connection)?;

                    let tag_rows: Vec<RecipeTag> = tag_ids
                        .iter()
                        .map(|tag_id| RecipeTag::new(recipe.id, *tag_id))
                        .collect();
                    diesel::insert_into(recipes_tags::table)
                        .values(&tag_rows)
                        .execute(connection)?;
                }

                if let Some(ingredient_lines) = payload.ingredients {
                    diesel::delete(
                        recipes_ingredients::table
                            .filter(recipes_ingredients::recipe_id.eq(recipe.id)),
                    )
                    .execute(connection)?;

                    let ingredient_rows: Vec<RecipeIngredient> = ingredient_lines
                        .iter()
                        .map(|line| RecipeIngredient::new(recipe.id, line.id, line.amount))
                        .collect();
                    diesel::insert_into(recipes_ingredients::table)
                        .values(&ingredient_rows)
                        .execute(connection)?;
                }

                let recipe = Recipe::by_id(recipe.id, connection)?;
                RecipeOut::build(recipe, Some(viewer.id), connection).map_err(ApiError::from)
            })
        })
        .await?;

    Ok(Json(response))
}

pub async fn destroy(
    State(state): State<Arc<AppState>>,
    AuthUser(viewer): AuthUser,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state
        .db(move |connection| {
            use crate::database::schema::recipes;

            let recipe = Recipe::by_id(recipe_id, connection)?;
            if recipe.author_id != viewer.id {
                return Err(ApiError::Forbidden);
            }

            diesel::delete(recipes::table.find(recipe.id))
                .execute(connection)
                .map_err(ApiError::from)
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn favorite(
    State(state): State<Arc<AppState>>,
    AuthUser(viewer): AuthUser,
    Path(recipe_id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeShortOut>), ApiError> {
    let payload = state
        .db(move |connection| {
            use crate::database::schema::favorites;

            let recipe = Recipe::by_id(recipe_id, connection)?;

            match diesel::insert_into(favorites::table)
                .values(&Favorite::new(viewer.id, recipe.id))
                .execute(connection)
            {
                Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                    return Err(ApiError::BadRequest(
                        "Recipe is already in favorites.".to_owned(),
                    ))
                }
                result => {
                    result?;
                }
            }

            Ok(RecipeShortOut::from(&recipe))
        })
        .await?;

    Ok((StatusCode::CREATED, Json(payload)))
}

pub async fn unfavorite(
    State(state): State<Arc<AppState>>,
    AuthUser(viewer): AuthUser,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state
        .db(move |connection| {
            use crate::database::schema::favorites;

            diesel::delete(
                favorites::table
                    .filter(favorites::user_id.eq(viewer.id))
                    .filter(favorites::recipe_id.eq(recipe_id)),
            )
            .execute(connection)
            .map_err(ApiError::from)
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_to_cart(
    State(state): State<Arc<AppState>>,
    AuthUser(viewer): AuthUser,
    Path(recipe_id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeShortOut>), ApiError> {
    let payload = state
        .db(move |connection| {
            use crate::database::schema::shopping_carts;

            let recipe = Recipe::by_id(recipe_id, connection)?;

            // The composite primary key keeps a recipe from entering the
            // same cart twice, so ingredients are never double-counted.
            match diesel::insert_into(shopping_carts::table)
                .values(&ShoppingCart::new(viewer.id, recipe.id))
                .execute(connection)
            {
                Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                    return Err(ApiError::BadRequest(
                        "Recipe is already in the shopping cart.".to_owned(),
                    ))
                }
                result => {
                    result?;
                }
            }

            Ok(RecipeShortOut::from(&recipe))
        })
        .await?;

    Ok((StatusCode::CREATED, Json(payload)))
}

pub async fn remove_from_cart(
    State(state): State<Arc<AppState>>,
    AuthUser(viewer): AuthUser,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state
        .db(move |connection| {
            use crate::database::schema::shopping_carts;

            diesel::delete(
                shopping_carts::table
                    .filter(shopping_carts::user_id.eq(viewer.id))
                    .filter(shopping_carts::recipe_id.eq(recipe_id)),
            )
            .execute(connection)
            .map_err(ApiError::from)
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn download_shopping_cart(
    State(state): State<Arc<AppState>>,
    AuthUser(viewer): AuthUser,
) -> Result<Response, ApiError> {
    let export = state
        .db(move |connection| export_shopping_list(viewer.id, connection).map_err(ApiError::from))
        .await?;

    let headers = [
        (header::CONTENT_TYPE, export.content_type.to_owned()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.filename),
        ),
    ];

    Ok((headers, export.bytes).into_response())
}
