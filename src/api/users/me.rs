use crate::auth::AuthUser;
use crate::types::UserProfile;
use axum::{http::StatusCode, response::IntoResponse, Json};

#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Authenticated caller's profile", body = UserProfile),
        (status = 401, description = "Unauthorized", body = crate::api::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(AuthUser(user): AuthUser) -> impl IntoResponse {
    // Nobody follows themselves, so is_subscribed is always false here
    (StatusCode::OK, Json(UserProfile::from_user(user, false)))
}
