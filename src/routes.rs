use axum::{
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Protected API
        .merge(api_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/whoami", get(handlers::auth::whoami))
        .merge(user_routes())
        .merge(event_routes())
        .merge(association_routes())
        .merge(complaint_routes())
        .merge(room_routes())
        .merge(questionnaire_routes())
        .merge(solution_routes())
        .merge(notification_routes())
        .route_layer(axum::middleware::from_fn(crate::middleware::require_auth))
}

fn user_routes() -> Router<AppState> {
    use handlers::users;

    Router::new()
        .route("/api/users", get(users::list))
        .route(
            "/api/users/:id",
            get(users::get).put(users::update).delete(users::delete),
        )
}

fn event_routes() -> Router<AppState> {
    use handlers::events;

    Router::new()
        .route("/api/events", get(events::list).post(events::create))
        .route(
            "/api/events/:id",
            get(events::get).put(events::update).delete(events::delete),
        )
}

fn association_routes() -> Router<AppState> {
    use handlers::associations;

    Router::new()
        .route("/api/associations", get(associations::list).post(associations::create))
        .route(
            "/api/associations/:id",
            get(associations::get).put(associations::update).delete(associations::delete),
        )
        // Approval toggle is its own operation, admin-gated
        .route("/api/associations/:id/approval", put(associations::set_approval))
}

fn complaint_routes() -> Router<AppState> {
    use handlers::complaints;

    Router::new()
        .route("/api/complaints", get(complaints::list).post(complaints::create))
        .route(
            "/api/complaints/:id",
            get(complaints::get).put(complaints::update).delete(complaints::delete),
        )
        .route("/api/complaints/:id/status", put(complaints::set_status))
}

fn room_routes() -> Router<AppState> {
    use handlers::rooms;

    Router::new()
        .route("/api/rooms", get(rooms::list).post(rooms::create))
        .route(
            "/api/rooms/:id",
            get(rooms::get).put(rooms::update).delete(rooms::delete),
        )
}

fn questionnaire_routes() -> Router<AppState> {
    use handlers::questionnaires;

    Router::new()
        .route(
            "/api/questionnaires",
            get(questionnaires::list).post(questionnaires::create),
        )
        .route(
            "/api/questionnaires/:id",
            get(questionnaires::get).delete(questionnaires::delete),
        )
}

fn solution_routes() -> Router<AppState> {
    use handlers::solutions;

    Router::new()
        .route("/api/solutions", get(solutions::list).post(solutions::create))
        .route(
            "/api/solutions/:id",
            get(solutions::get).put(solutions::update).delete(solutions::delete),
        )
        .route("/api/solutions/:id/status", put(solutions::set_status))
}

fn notification_routes() -> Router<AppState> {
    use handlers::notifications;

    Router::new()
        .route("/api/notifications", get(notifications::list))
        .route("/api/notifications/:id/read", put(notifications::mark_read))
        .route("/api/notifications/read-all", put(notifications::mark_all_read))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "data": {
            "name": "Campus Care API",
            "version": version,
            "description": "Campus mental-health & community platform backend",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/register, /auth/login (public), /api/auth/whoami (protected)",
                "users": "/api/users[/:id] (protected)",
                "events": "/api/events[/:id] (protected)",
                "associations": "/api/associations[/:id][/approval] (protected)",
                "complaints": "/api/complaints[/:id][/status] (protected)",
                "rooms": "/api/rooms[/:id] (protected)",
                "questionnaires": "/api/questionnaires[/:id] (protected)",
                "solutions": "/api/solutions[/:id][/status] (protected)",
                "notifications": "/api/notifications (protected)",
            }
        }
    }))
}

async fn health() -> axum::response::Json<Value> {
    axum::response::Json(json!({
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
        }
    }))
}
