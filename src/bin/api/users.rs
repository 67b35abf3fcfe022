use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use super::{
    auth::AuthUser,
    error::ApiError,
    pagination::{Page, PageQuery},
    payloads::{SubscriptionOut, UserOut},
};
use crate::{
    database::models::{subscription::Subscription, user::User},
    state::AppState,
};

pub async fn list(
    State(state): State<Arc<AppState>>,
    AuthUser(viewer): AuthUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<Page<UserOut>>, ApiError> {
    let payload = state
        .db(move |connection| {
            use crate::database::schema::users;

            let count: i64 = users::table.count().get_result(connection)?;
            let rows: Vec<User> = users::table
                .order(users::id)
                .limit(page.limit())
                .offset(page.offset())
                .load(connection)?;

            let results = rows
                .iter()
                .map(|user| UserOut::build(user, Some(viewer.id), connection))
                .collect::<QueryResult<Vec<_>>>()?;

            Ok(Page { count, results })
        })
        .await?;

    Ok(Json(payload))
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(viewer): AuthUser,
) -> Result<Json<UserOut>, ApiError> {
    let payload = state
        .db(move |connection| {
            UserOut::build(&viewer, Some(viewer.id), connection).map_err(ApiError::from)
        })
        .await?;

    Ok(Json(payload))
}

pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    AuthUser(viewer): AuthUser,
    Path(user_id): Path<i32>,
) -> Result<Json<UserOut>, ApiError> {
    let payload = state
        .db(move |connection| {
            let user = User::by_id(user_id, connection)?;
            UserOut::build(&user, Some(viewer.id), connection).map_err(ApiError::from)
        })
        .await?;

    Ok(Json(payload))
}

pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    AuthUser(viewer): AuthUser,
    Path(user_id): Path<i32>,
) -> Result<(StatusCode, Json<SubscriptionOut>), ApiError> {
    let payload = state
        .db(move |connection| {
            use crate::database::schema::subscriptions;

            let author = User::by_id(user_id, connection)?;
            if author.id == viewer.id {
                return Err(ApiError::BadRequest(
                    "Subscribing to yourself is not allowed.".to_owned(),
                ));
            }

            let subscription = Subscription::new(viewer.id, author.id);
            match diesel::insert_into(subscriptions::table)
                .values(&subscription)
                .execute(connection)
            {
                Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                    return Err(ApiError::BadRequest("Already subscribed.".to_owned()))
                }
                result => {
                    result?;
                }
            }

            SubscriptionOut::build(&author, viewer.id, connection).map_err(ApiError::from)
        })
        .await?;

    Ok((StatusCode::CREATED, Json(payload)))
}

pub async fn unsubscribe(
    State(state): State<Arc<AppState>>,
    AuthUser(viewer): AuthUser,
    Path(author): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state
        .db(move |connection| {
            use crate::database::schema::subscriptions;

            diesel::delete(
                subscriptions::table
                    .filter(subscriptions::user_id.eq(viewer.id))
                    .filter(subscriptions::author_id.eq(author)),
            )
            .execute(connection)
            .map_err(ApiError::from)
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn subscriptions(
    State(state): State<Arc<AppState>>,
    AuthUser(viewer): AuthUser,
) -> Result<Json<Vec<SubscriptionOut>>, ApiError> {
    let payload = state
        .db(move |connection| {
            let authors = Subscription::authors_of(viewer.id, connection)?;

            authors
                .iter()
                .map(|author| SubscriptionOut::build(author, viewer.id, connection))
                .collect::<QueryResult<Vec<_>>>()
                .map_err(ApiError::from)
        })
        .await?;

    Ok(Json(payload))
}
