use crate::api::pagination::PageParams;
use crate::api::recipes::response::build_recipe_dtos;
use crate::api::ErrorResponse;
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Recipe;
use crate::raw_sql::count_over;
use crate::schema::{favorites, recipes, shopping_cart};
use crate::types::{PaginationMetadata, RecipeDto};
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
pub struct ListRecipesParams {
    /// 1-based page number (default: 1)
    pub page: Option<i64>,
    /// Page size (default: 10, max: 100)
    pub limit: Option<i64>,
    /// Only recipes by this author
    pub author: Option<i32>,
    /// `1` restricts to the caller's favorites; ignored for anonymous callers
    pub is_favorited: Option<u8>,
    /// `1` restricts to the caller's shopping cart; ignored for anonymous callers
    pub is_in_shopping_cart: Option<u8>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeDto>,
    pub pagination: PaginationMetadata,
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Page of recipes, newest first", body = ListRecipesResponse)
    )
)]
pub async fn list_recipes(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListRecipesParams>,
) -> impl IntoResponse {
    let (page, limit, offset) = PageParams {
        page: params.page,
        limit: params.limit,
    }
    .resolve();
    let viewer_id = viewer.as_ref().map(|u| u.id);

    let mut conn = get_conn!(pool);

    let mut query = recipes::table
        .order(recipes::created_at.desc())
        .into_boxed();

    if let Some(author_id) = params.author {
        query = query.filter(recipes::author_id.eq(author_id));
    }

    // The relation filters only mean something for a logged-in caller
    if let Some(me) = viewer_id {
        if params.is_favorited == Some(1) {
            let favorited = favorites::table
                .filter(favorites::user_id.eq(me))
                .select(favorites::recipe_id);
            query = query.filter(recipes::id.eq_any(favorited));
        }
        if params.is_in_shopping_cart == Some(1) {
            let in_cart = shopping_cart::table
                .filter(shopping_cart::user_id.eq(me))
                .select(shopping_cart::recipe_id);
            query = query.filter(recipes::id.eq_any(in_cart));
        }
    }

    let rows: Vec<(Recipe, i64)> = match query
        .select((Recipe::as_select(), count_over()))
        .limit(limit)
        .offset(offset)
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to list recipes: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipes".to_string(),
                }),
            )
                .into_response();
        }
    };

    let total = rows.first().map(|(_, count)| *count).unwrap_or(0);
    let page_recipes: Vec<Recipe> = rows.into_iter().map(|(r, _)| r).collect();

    let recipes = match build_recipe_dtos(&mut conn, page_recipes, viewer_id) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to build recipe list: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipes".to_string(),
                }),
            )
                .into_response();
        }
    };

    (
        StatusCode::OK,
        Json(ListRecipesResponse {
            recipes,
            pagination: PaginationMetadata { total, page, limit },
        }),
    )
        .into_response()
}
