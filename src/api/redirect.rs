//! Public short-link redirect: `GET /r/{code}/` resolves the code and bounces
//! the browser to the canonical recipe page.

use crate::api::ErrorResponse;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::get_conn;
use crate::short_link::{self, ShortLinkError};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

/// Returns the router for /r short-link redirects
pub fn router() -> Router<AppState> {
    // Emitted links carry a trailing slash; accept both spellings
    Router::new()
        .route("/{code}", get(redirect_short_link))
        .route("/{code}/", get(redirect_short_link))
}

#[utoipa::path(
    get,
    path = "/r/{code}",
    tag = "short-links",
    params(("code" = String, Path, description = "Recipe short code (decimal id)")),
    responses(
        (status = 302, description = "Redirect to the recipe detail page"),
        (status = 404, description = "Unknown or malformed short code", body = ErrorResponse)
    )
)]
pub async fn redirect_short_link(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<AppConfig>>,
    Path(code): Path<String>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match short_link::decode(&mut conn, &config.base_url, &code) {
        Ok((_, url)) => (StatusCode::FOUND, [(header::LOCATION, url)]).into_response(),
        // Malformed and unknown codes both 404, with distinct messages
        Err(err @ (ShortLinkError::InvalidFormat | ShortLinkError::NotFound)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to resolve short link: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to resolve short link".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[derive(OpenApi)]
#[openapi(paths(redirect_short_link))]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use diesel::r2d2::{ConnectionManager, Pool};
    use diesel::PgConnection;
    use std::time::Duration;
    use tower::ServiceExt;

    // A state whose pool fails fast without a database. A matched route then
    // answers 500 from the connection check, while an unmatched path answers
    // 404 before the pool is touched.
    fn stub_state() -> AppState {
        let manager =
            ConnectionManager::<PgConnection>::new("postgres://localhost:1/unreachable");
        let pool = Pool::builder()
            .connection_timeout(Duration::from_millis(50))
            .build_unchecked(manager);
        AppState {
            pool: Arc::new(pool),
            config: Arc::new(AppConfig {
                database_url: String::new(),
                bind_addr: "127.0.0.1:0".to_string(),
                base_url: "http://localhost".to_string(),
            }),
        }
    }

    async fn status_for(path: &str) -> StatusCode {
        let app = axum::Router::new()
            .nest("/r", router())
            .with_state(stub_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri(path)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        response.status()
    }

    #[tokio::test]
    async fn test_emitted_short_url_path_is_routable() {
        // The exact path the service hands out in get-link responses
        let emitted = crate::short_link::short_url("", 42);
        assert_eq!(emitted, "/r/42/");
        assert_eq!(
            status_for(&emitted).await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        // The slash-less spelling resolves too
        assert_eq!(
            status_for("/r/42").await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_unknown_paths_do_not_match() {
        assert_eq!(status_for("/r/42/extra").await, StatusCode::NOT_FOUND);
    }
}
