use crate::api::pagination::PageParams;
use crate::api::ErrorResponse;
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::User;
use crate::raw_sql::count_over;
use crate::schema::{subscriptions, users};
use crate::types::{PaginationMetadata, UserProfile};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListUsersResponse {
    pub users: Vec<UserProfile>,
    pub pagination: PaginationMetadata,
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(PageParams),
    responses(
        (status = 200, description = "Page of registered users", body = ListUsersResponse),
        (status = 500, description = "Server error", body = ErrorResponse)
    )
)]
pub async fn list_users(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<PageParams>,
) -> impl IntoResponse {
    let (page, limit, offset) = params.resolve();

    let mut conn = get_conn!(pool);

    let rows: Vec<(User, i64)> = match users::table
        .order(users::id.asc())
        .select((User::as_select(), count_over()))
        .limit(limit)
        .offset(offset)
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to list users: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch users".to_string(),
                }),
            )
                .into_response();
        }
    };

    let total = rows.first().map(|(_, count)| *count).unwrap_or(0);

    // One query for the viewer's subscriptions across the whole page
    let followed: HashSet<i32> = match &viewer {
        Some(me) => {
            let ids: Vec<i32> = rows.iter().map(|(u, _)| u.id).collect();
            match subscriptions::table
                .filter(subscriptions::user_id.eq(me.id))
                .filter(subscriptions::author_id.eq_any(&ids))
                .select(subscriptions::author_id)
                .load(&mut conn)
            {
                Ok(v) => v.into_iter().collect(),
                Err(e) => {
                    tracing::error!("Failed to load subscriptions: {}", e);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ErrorResponse {
                            error: "Failed to fetch users".to_string(),
                        }),
                    )
                        .into_response();
                }
            }
        }
        None => HashSet::new(),
    };

    let users = rows
        .into_iter()
        .map(|(user, _)| {
            let is_subscribed = followed.contains(&user.id);
            UserProfile::from_user(user, is_subscribed)
        })
        .collect();

    (
        StatusCode::OK,
        Json(ListUsersResponse {
            users,
            pagination: PaginationMetadata { total, page, limit },
        }),
    )
        .into_response()
}
