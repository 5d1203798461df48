use crate::api::pagination::PageParams;
use crate::api::users::author_with_recipes;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::User;
use crate::raw_sql::count_over;
use crate::schema::{subscriptions, users};
use crate::subscriptions::parse_recipes_limit;
use crate::types::{PaginationMetadata, UserWithRecipes};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListSubscriptionsParams {
    /// 1-based page number (default: 1)
    pub page: Option<i64>,
    /// Page size (default: 10, max: 100)
    pub limit: Option<i64>,
    /// Cap on the number of recipes embedded per author. Absent or non-numeric
    /// means all of them.
    pub recipes_limit: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListSubscriptionsResponse {
    pub authors: Vec<UserWithRecipes>,
    pub pagination: PaginationMetadata,
}

#[utoipa::path(
    get,
    path = "/api/users/subscriptions",
    tag = "users",
    params(ListSubscriptionsParams),
    responses(
        (status = 200, description = "Page of followed authors", body = ListSubscriptionsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_subscriptions(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListSubscriptionsParams>,
) -> impl IntoResponse {
    let (page, limit, offset) = PageParams {
        page: params.page,
        limit: params.limit,
    }
    .resolve();
    let recipes_limit = parse_recipes_limit(params.recipes_limit.as_deref());

    let mut conn = get_conn!(pool);

    let rows: Vec<(User, i64)> = match users::table
        .inner_join(subscriptions::table.on(subscriptions::author_id.eq(users::id)))
        .filter(subscriptions::user_id.eq(user.id))
        .order(subscriptions::created_at.desc())
        .select((User::as_select(), count_over()))
        .limit(limit)
        .offset(offset)
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to list subscriptions: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch subscriptions".to_string(),
                }),
            )
                .into_response();
        }
    };

    let total = rows.first().map(|(_, count)| *count).unwrap_or(0);

    let mut authors = Vec::with_capacity(rows.len());
    for (author, _) in rows {
        match author_with_recipes(&mut conn, author, recipes_limit) {
            Ok(entry) => authors.push(entry),
            Err(e) => {
                tracing::error!("Failed to build author profile: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Failed to fetch subscriptions".to_string(),
                    }),
                )
                    .into_response();
            }
        }
    }

    (
        StatusCode::OK,
        Json(ListSubscriptionsResponse {
            authors,
            pagination: PaginationMetadata { total, page, limit },
        }),
    )
        .into_response()
}
