use crate::api::users::author_with_recipes;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::subscriptions::{self, parse_recipes_limit, SubscriptionError};
use crate::types::UserWithRecipes;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SubscribeParams {
    /// Cap on the number of recipes embedded in the response. Absent or
    /// non-numeric means all of them.
    pub recipes_limit: Option<String>,
}

fn subscription_error_response(err: SubscriptionError) -> axum::response::Response {
    let status = match &err {
        SubscriptionError::AuthorNotFound => StatusCode::NOT_FOUND,
        SubscriptionError::SelfSubscription
        | SubscriptionError::AlreadySubscribed
        | SubscriptionError::NotSubscribed => StatusCode::BAD_REQUEST,
        SubscriptionError::Db(e) => {
            tracing::error!("Subscription operation failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Subscription operation failed".to_string(),
                }),
            )
                .into_response();
        }
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe",
    tag = "users",
    params(("id" = i32, Path, description = "Author ID"), SubscribeParams),
    responses(
        (status = 201, description = "Subscribed; author profile with recipes", body = UserWithRecipes),
        (status = 400, description = "Self-subscription or already subscribed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn subscribe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
    Query(params): Query<SubscribeParams>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let author = match subscriptions::subscribe(&mut conn, user.id, id) {
        Ok(a) => a,
        Err(e) => return subscription_error_response(e),
    };

    let recipes_limit = parse_recipes_limit(params.recipes_limit.as_deref());

    match author_with_recipes(&mut conn, author, recipes_limit) {
        Ok(body) => (StatusCode::CREATED, Json(body)).into_response(),
        Err(e) => {
            tracing::error!("Failed to build author profile: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to build author profile".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe",
    tag = "users",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 400, description = "Not subscribed to this author", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn unsubscribe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match subscriptions::unsubscribe(&mut conn, user.id, id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => subscription_error_response(e),
    }
}
