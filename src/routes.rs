// src/routes.rs

use axum::{
    Router,
    http::{Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{attempt, exam, results, teacher},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Teacher routes require a bearer token, except register/login.
/// * Student routes (join, questions, answers) are open.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let teacher_routes = Router::new()
        .route("/register", post(teacher::register))
        .route("/login", post(teacher::login));

    let exam_routes = Router::new()
        .route(
            "/",
            get(exam::list_exams)
                .post(exam::create_exam)
                .route_layer(auth.clone()),
        )
        .route(
            "/{exam_id}/questions",
            get(exam::list_questions).merge(post(exam::add_question).route_layer(auth.clone())),
        )
        .merge(
            Router::new()
                .route("/{exam_id}/results", get(results::get_results))
                .route("/{exam_id}/export/{format}", get(results::export_results))
                .route_layer(auth),
        );

    let attempt_routes = Router::new()
        .route("/{attempt_id}", get(attempt::get_attempt))
        .route("/{attempt_id}/answers", get(attempt::list_answers))
        .route("/{attempt_id}/switch", post(attempt::record_switch));

    Router::new()
        .nest("/api/teacher", teacher_routes)
        .nest("/api/exams", exam_routes)
        .nest("/api/attempts", attempt_routes)
        .route("/api/join", post(attempt::join))
        .route("/api/answer", post(attempt::submit_answer))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
