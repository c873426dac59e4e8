//! Middleware de sesión
//!
//! Lee la cookie `gearguard_session`, verifica la firma y busca la sesión en
//! el estado. Sin sesión vigente, las rutas `/api/*` responden 401.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{extract_session_cookie, verify_session_token, JwtConfig},
    },
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
}

/// Id de sesión de la request, si trae una cookie válida
pub fn session_id_from_request(request_headers: &axum::http::HeaderMap, config: &JwtConfig) -> Option<Uuid> {
    let token = request_headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(extract_session_cookie)?;
    verify_session_token(token, config).ok()
}

pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let jwt_config = JwtConfig::from(&state.config);
    let session_id = session_id_from_request(request.headers(), &jwt_config)
        .ok_or_else(|| AppError::Unauthorized("Login required".to_string()))?;

    let session = state
        .session(&session_id)
        .await
        .ok_or_else(|| AppError::Unauthorized("Session expired".to_string()))?;

    request.extensions_mut().insert(AuthenticatedUser {
        session_id,
        user_id: session.user_id,
        name: session.user_name,
    });

    Ok(next.run(request).await)
}
