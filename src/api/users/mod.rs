pub mod avatar;
pub mod create;
pub mod get;
pub mod list;
pub mod me;
pub mod set_password;
pub mod subscribe;
pub mod subscriptions;

use crate::models::{Recipe, User};
use crate::schema::recipes;
use crate::types::{RecipeMinified, UserProfile, UserWithRecipes};
use crate::AppState;
use axum::routing::{get as get_method, post, put};
use axum::Router;
use diesel::prelude::*;
use utoipa::OpenApi;

/// Returns the router for /api/users endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get_method(list::list_users).post(create::create_user))
        .route("/me", get_method(me::me))
        .route(
            "/me/avatar",
            put(avatar::set_avatar).delete(avatar::delete_avatar),
        )
        .route("/set_password", post(set_password::set_password))
        .route("/subscriptions", get_method(subscriptions::list_subscriptions))
        .route("/{id}", get_method(get::get_user))
        .route(
            "/{id}/subscribe",
            post(subscribe::subscribe).delete(subscribe::unsubscribe),
        )
}

/// Build the annotated author profile returned by the subscription endpoints:
/// the author's total recipe count plus up to `recipes_limit` of their most
/// recent recipes.
pub fn author_with_recipes(
    conn: &mut PgConnection,
    author: User,
    recipes_limit: Option<i64>,
) -> QueryResult<UserWithRecipes> {
    let recipes_count: i64 = recipes::table
        .filter(recipes::author_id.eq(author.id))
        .count()
        .get_result(conn)?;

    let mut query = recipes::table
        .filter(recipes::author_id.eq(author.id))
        .order(recipes::created_at.desc())
        .select(Recipe::as_select())
        .into_boxed();

    if let Some(limit) = recipes_limit {
        query = query.limit(limit);
    }

    let author_recipes: Vec<Recipe> = query.load(conn)?;

    Ok(UserWithRecipes {
        // Subscription responses always describe an author the caller follows
        profile: UserProfile::from_user(author, true),
        recipes: author_recipes.into_iter().map(RecipeMinified::from).collect(),
        recipes_count,
    })
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_user,
        list::list_users,
        get::get_user,
        me::me,
        set_password::set_password,
        avatar::set_avatar,
        avatar::delete_avatar,
        subscribe::subscribe,
        subscribe::unsubscribe,
        subscriptions::list_subscriptions,
    ),
    components(schemas(
        create::CreateUserRequest,
        create::CreateUserResponse,
        set_password::SetPasswordRequest,
        avatar::SetAvatarRequest,
        avatar::SetAvatarResponse,
        list::ListUsersResponse,
        subscriptions::ListSubscriptionsResponse,
    ))
)]
pub struct ApiDoc;
