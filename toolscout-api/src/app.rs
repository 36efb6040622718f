/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with all
/// routes and middleware.
///
/// # Route map
///
/// ```text
/// /
/// ├── /health                    # Health check (public)
/// └── /api/
///     ├── GET    /               # API banner
///     ├── POST   /register       # Create account
///     ├── POST   /login          # Password login, returns session token
///     ├── GET    /me             # Current user (authenticated)
///     ├── GET    /tools          # Filtered/searched/paginated catalog
///     ├── GET    /tools/:id      # Single tool
///     ├── POST   /tools          # Add a tool
///     ├── GET    /categories     # Enum listing
///     ├── GET    /price-models   # Enum listing
///     ├── GET    /platforms      # Enum listing
///     ├── POST   /seed-data      # Seed sample catalog
///     ├── GET    /reviews/:id    # Reviews for a tool (paginated)
///     ├── POST   /reviews        # Write review (authenticated)
///     ├── PUT    /reviews/:id    # Edit own review (authenticated)
///     ├── DELETE /reviews/:id    # Delete own review (authenticated)
///     ├── GET    /comments/:id   # Comments on a review
///     └── POST   /comments       # Comment on a review (authenticated)
/// ```
///
/// Authenticated routes sit behind `auth_middleware`, which rejects a
/// missing, invalid, or expired bearer token with 401 before the handler
/// runs, then injects the resolved `User` into request extensions.

use crate::{config::Config, error::ApiError};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use toolscout_shared::{auth::jwt, models::user::User};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the token-signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public API surface
    let public_routes = Router::new()
        .route("/", get(routes::root))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/tools", get(routes::tools::list_tools))
        .route("/tools", post(routes::tools::create_tool))
        .route("/tools/:id", get(routes::tools::get_tool))
        .route("/categories", get(routes::tools::list_categories))
        .route("/price-models", get(routes::tools::list_price_models))
        .route("/platforms", get(routes::tools::list_platforms))
        .route("/seed-data", post(routes::tools::seed_data))
        .route("/reviews/:id", get(routes::reviews::list_reviews))
        .route("/comments/:id", get(routes::comments::list_comments));

    // Routes that require a valid session token
    let protected_routes = Router::new()
        .route("/me", get(routes::auth::me))
        .route("/reviews", post(routes::reviews::create_review))
        .route("/reviews/:id", put(routes::reviews::update_review))
        .route("/reviews/:id", delete(routes::reviews::delete_review))
        .route("/comments", post(routes::comments::create_comment))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = public_routes.merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Session token authentication middleware
///
/// Extracts and validates the bearer token from the Authorization header,
/// resolves the subject to an account, and injects the `User` into request
/// extensions. Token validation happens before any storage access; the user
/// lookup is the first and only query on the rejection path.
async fn auth_middleware(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    let user = User::find_by_username(&state.db, &claims.sub)
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(|| ApiError::Unauthorized("Invalid token".to_string()))?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
