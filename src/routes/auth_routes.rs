use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use crate::controllers::AuthController;
use crate::dto::auth_dto::{LoginRequest, LoginResponse, SignupRequest};
use crate::dto::request_dto::WriteAck;
use crate::middleware::session_id_from_request;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{expired_session_cookie, generate_session_token, session_cookie, JwtConfig};

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/logout", post(logout))
}

fn set_cookie(value: String) -> Result<HeaderMap, AppError> {
    let mut headers = HeaderMap::new();
    let value = HeaderValue::from_str(&value).map_err(|e| AppError::Internal(format!("Cookie inválida: {}", e)))?;
    headers.insert(header::SET_COOKIE, value);
    Ok(headers)
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let controller = AuthController::new(state.repository.clone(), state.config.bcrypt_cost);
    let user = controller.login(request).await?;

    let session_id = state.open_session(user.id, user.name.clone()).await;
    let jwt_config = JwtConfig::from(&state.config);
    let token = generate_session_token(session_id, &user.name, &jwt_config)?;
    tracing::info!("✅ Login correcto: {}", user.email);

    Ok((set_cookie(session_cookie(&token, &jwt_config))?, Json(LoginResponse { user: user.name })))
}

async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let controller = AuthController::new(state.repository.clone(), state.config.bcrypt_cost);
    controller.signup(request).await?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({}))))
}

/// Siempre responde 200 y expira la cookie, haya o no sesión
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<impl IntoResponse, AppError> {
    let jwt_config = JwtConfig::from(&state.config);
    if let Some(session_id) = session_id_from_request(&headers, &jwt_config) {
        if state.close_session(&session_id).await {
            tracing::info!("👋 Sesión {} cerrada", session_id);
        }
    }
    Ok((set_cookie(expired_session_cookie())?, Json(WriteAck::ok())))
}
