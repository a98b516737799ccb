//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{CommentService, LikeService, PostService, UserService};
use crate::domain::RepositoryProvider;
use crate::interfaces::http::common::{ApiResponse, AuthorDto, Deleted, PaginatedResponse};
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::{auth, comments, health, likes, metrics, posts, users};
use crate::shared::PaginationPolicy;

/// Everything the handlers need. Each handler extracts its own slice of it
/// through `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub posts: Arc<PostService>,
    pub comments: Arc<CommentService>,
    pub likes: Arc<LikeService>,
    pub pagination: PaginationPolicy,
    pub auth: AuthState,
    pub health: health::HealthState,
}

impl AppState {
    /// Wire one service per aggregate over the same repositories.
    ///
    /// `db` is only used by the health probe; pass `None` for the in-memory
    /// store.
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        users: UserService,
        pagination: PaginationPolicy,
        db: Option<DatabaseConnection>,
    ) -> Self {
        let auth = AuthState {
            jwt_config: users.jwt_config().clone(),
        };
        Self {
            users: Arc::new(users),
            posts: Arc::new(PostService::new(repos.clone())),
            comments: Arc::new(CommentService::new(repos.clone())),
            likes: Arc::new(LikeService::new(repos)),
            pagination,
            auth,
            health: health::HealthState {
                db,
                started_at: Arc::new(Instant::now()),
            },
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(s: &AppState) -> Self {
        s.auth.clone()
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        s.health.clone()
    }
}

impl FromRef<AppState> for auth::AuthHandlerState {
    fn from_ref(s: &AppState) -> Self {
        auth::AuthHandlerState {
            users: Arc::clone(&s.users),
        }
    }
}

impl FromRef<AppState> for users::UserHandlerState {
    fn from_ref(s: &AppState) -> Self {
        users::UserHandlerState {
            users: Arc::clone(&s.users),
            pagination: s.pagination,
        }
    }
}

impl FromRef<AppState> for posts::PostHandlerState {
    fn from_ref(s: &AppState) -> Self {
        posts::PostHandlerState {
            posts: Arc::clone(&s.posts),
            pagination: s.pagination,
        }
    }
}

impl FromRef<AppState> for comments::CommentHandlerState {
    fn from_ref(s: &AppState) -> Self {
        comments::CommentHandlerState {
            comments: Arc::clone(&s.comments),
            pagination: s.pagination,
        }
    }
}

impl FromRef<AppState> for likes::LikeHandlerState {
    fn from_ref(s: &AppState) -> Self {
        likes::LikeHandlerState {
            likes: Arc::clone(&s.likes),
            pagination: s.pagination,
        }
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from POST /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        users::get_me,
        users::list_users,
        users::get_user,
        posts::create_post,
        posts::list_posts,
        posts::list_user_posts,
        posts::get_post,
        posts::delete_post,
        comments::create_comment,
        comments::list_comments,
        comments::update_comment,
        comments::delete_comment,
        likes::create_like,
        likes::get_likes,
        likes::delete_like,
    ),
    components(
        schemas(
            ApiResponse<String>,
            PaginatedResponse<posts::PostDto>,
            AuthorDto,
            Deleted,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::LoginResponse,
            users::UserDto,
            posts::CreatePostRequest,
            posts::PostDto,
            comments::CommentRequest,
            comments::CommentDto,
            likes::LikeDto,
            likes::LikeStatus,
            likes::LikeStatusResponse,
            likes::LikesListStatus,
            likes::LikesListResponse,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and database health"),
        (name = "Authentication", description = "Registration and JWT login"),
        (name = "Users", description = "User profiles"),
        (name = "Posts", description = "Posts, newest first"),
        (name = "Comments", description = "Comments on posts"),
        (name = "Likes", description = "One like per user per post"),
    ),
    info(
        title = "Postboard API",
        version = "1.0.0",
        description = "Posts, comments, likes and user profiles"
    )
)]
pub struct ApiDoc;

/// Build the full HTTP surface.
///
/// `/metrics` is mounted only when a Prometheus handle is supplied.
pub fn create_api_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login));

    let protected = Router::new()
        .route("/api/v1/users", get(users::list_users))
        .route("/api/v1/users/me", get(users::get_me))
        .route("/api/v1/users/{id}", get(users::get_user))
        .route("/api/v1/users/{id}/posts", get(posts::list_user_posts))
        .route(
            "/api/v1/posts",
            get(posts::list_posts).post(posts::create_post),
        )
        .route(
            "/api/v1/posts/{id}",
            get(posts::get_post).delete(posts::delete_post),
        )
        .route(
            "/api/v1/posts/{id}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/api/v1/comments/{id}",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .route(
            "/api/v1/posts/{id}/likes",
            get(likes::get_likes)
                .post(likes::create_like)
                .delete(likes::delete_like),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ));

    let mut router = Router::new()
        .merge(public)
        .merge(protected)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()));

    if let Some(handle) = metrics_handle {
        let metrics_routes = Router::new()
            .route("/metrics", get(metrics::prometheus_metrics))
            .with_state(metrics::MetricsState { handle });
        router = router.merge(metrics_routes);
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
