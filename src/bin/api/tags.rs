use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;

use super::{error::ApiError, payloads::TagOut};
use crate::{database::models::tag::Tag, state::AppState};

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<TagOut>>, ApiError> {
    let payload = state
        .db(|connection| {
            use crate::database::schema::tags;

            let rows: Vec<Tag> = tags::table.order(tags::id).load(connection)?;

            Ok(rows.into_iter().map(TagOut::from).collect())
        })
        .await?;

    Ok(Json(payload))
}

pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    Path(tag_id): Path<i32>,
) -> Result<Json<TagOut>, ApiError> {
    let payload = state
        .db(move |connection| {
            use crate::database::schema::tags;

            let tag: Tag = tags::table.find(tag_id).first(connection)?;

            Ok(TagOut::from(tag))
        })
        .await?;

    Ok(Json(payload))
}
