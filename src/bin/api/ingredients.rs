use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    Json,
};
use diesel::prelude::*;

use super::{error::ApiError, payloads::IngredientOut};
use crate::{
    database::{functions::f_unaccent, models::ingredient::Ingredient},
    state::AppState,
};

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<IngredientOut>>, ApiError> {
    let payload = state
        .db(move |connection| {
            use crate::database::schema::ingredients;

            let mut query = ingredients::table.into_boxed();
            if let Some(name) = params.get("name") {
                query = query
                    .filter(f_unaccent(ingredients::name).ilike(f_unaccent(format!("{name}%"))));
            }

            let rows: Vec<Ingredient> = query.order(ingredients::name).load(connection)?;

            Ok(rows.into_iter().map(IngredientOut::from).collect())
        })
        .await?;

    Ok(Json(payload))
}

pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    Path(ingredient_id): Path<i32>,
) -> Result<Json<IngredientOut>, ApiError> {
    let payload = state
        .db(move |connection| {
            use crate::database::schema::ingredients;

            let ingredient: Ingredient =
                ingredients::table.find(ingredient_id).first(connection)?;

            Ok(IngredientOut::from(ingredient))
        })
        .await?;

    Ok(Json(payload))
}
