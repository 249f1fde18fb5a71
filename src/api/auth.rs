use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tower_sessions::Session;

use super::{
    ApiError, ApiResponse, AppState, AuthStatusResponse, CreateTeacherRequest, LoginRequest,
    LoginResponse, TeacherDto,
};
use crate::api::validation::{validate_password, validate_username};

/// Session key holding the logged-in staff username.
const SESSION_USER_KEY: &str = "user";

// ============================================================================
// Middleware
// ============================================================================

/// Gate for staff-only routes. Only a session established via
/// `POST /auth/login` counts; there are no API keys or other side doors.
pub async fn auth_middleware(
    State(_state): State<Arc<AppState>>,
    session: Session,
    request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    if let Ok(Some(user)) = session.get::<String>(SESSION_USER_KEY).await {
        tracing::Span::current().record("user_id", &user);
        return Ok(next.run(request).await);
    }

    let response = (StatusCode::UNAUTHORIZED, "Unauthorized");
    Ok(response.into_response())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
/// Authenticate with username and password, establishes a session on success
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let is_valid = state
        .store()
        .verify_teacher_password(&payload.username, &payload.password)
        .await?;

    if !is_valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    if let Err(e) = session.insert(SESSION_USER_KEY, &payload.username).await {
        return Err(ApiError::internal(format!("Failed to create session: {e}")));
    }

    tracing::info!("Teacher logged in: {}", payload.username);

    Ok(Json(ApiResponse::success(LoginResponse {
        username: payload.username,
    })))
}

/// POST /auth/logout
/// Invalidate the current session
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    (StatusCode::OK, "Logged out")
}

/// GET /auth/status
/// Reports whether the caller is logged in and whether any staff account
/// exists yet. The UI uses the latter to decide between the bootstrap form
/// and the login form.
pub async fn status(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<AuthStatusResponse>>, ApiError> {
    let username = session
        .get::<String>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    let bootstrapped = state.store().has_any_teacher().await?;

    Ok(Json(ApiResponse::success(AuthStatusResponse {
        authenticated: username.is_some(),
        username,
        bootstrapped,
    })))
}

/// POST /auth/bootstrap
/// Create the very first staff account. Refused once any account exists;
/// after that new accounts go through the authenticated `POST /teachers`.
pub async fn bootstrap(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateTeacherRequest>,
) -> Result<Json<ApiResponse<TeacherDto>>, ApiError> {
    if state.store().has_any_teacher().await? {
        return Err(ApiError::Conflict(
            "A staff account already exists".to_string(),
        ));
    }

    let username = validate_username(&payload.username)?.to_string();
    validate_password(&payload.password)?;

    let security = state.config().read().await.security.clone();
    let teacher = state
        .store()
        .create_teacher(&username, &payload.password, &security)
        .await?;

    tracing::info!("Bootstrap: first staff account created: {}", username);

    Ok(Json(ApiResponse::success(teacher.into())))
}

/// POST /teachers
/// Add a staff account (requires authentication)
pub async fn create_teacher(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateTeacherRequest>,
) -> Result<Json<ApiResponse<TeacherDto>>, ApiError> {
    let username = validate_username(&payload.username)?.to_string();
    validate_password(&payload.password)?;

    let security = state.config().read().await.security.clone();
    let teacher = state
        .store()
        .create_teacher(&username, &payload.password, &security)
        .await?;

    tracing::info!("Staff account created: {}", username);

    Ok(Json(ApiResponse::success(teacher.into())))
}
