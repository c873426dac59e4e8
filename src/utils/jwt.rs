//! Utilidades JWT para la cookie de sesión
//!
//! La cookie `gearguard_session` lleva un JWT firmado cuyo `sid` apunta a una
//! sesión guardada en el servidor. Firmar evita que el cliente fabrique ids.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::environment::ServerConfig,
    utils::errors::{AppError, AppResult},
};

pub const SESSION_COOKIE: &str = "gearguard_session";

/// Claims de la cookie de sesión
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sid: String,  // session id
    pub name: String, // nombre mostrado
    pub exp: usize,   // expiration timestamp
    pub iat: usize,   // issued at timestamp
}

/// Configuración de firma
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

impl From<&ServerConfig> for JwtConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            secret: config.session_secret.clone(),
            expiration_hours: config.session_hours,
        }
    }
}

/// Generar el token de una sesión
pub fn generate_session_token(session_id: Uuid, name: &str, config: &JwtConfig) -> AppResult<String> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::hours(config.expiration_hours);

    let claims = SessionClaims {
        sid: session_id.to_string(),
        name: name.to_string(),
        exp: expires_at.timestamp().max(0) as usize,
        iat: now.timestamp().max(0) as usize,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(config.secret.as_ref()))
        .map_err(|e| AppError::Jwt(format!("Error generando token: {}", e)))
}

/// Verificar el token y devolver el id de sesión
pub fn verify_session_token(token: &str, config: &JwtConfig) -> AppResult<Uuid> {
    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| AppError::Jwt(format!("Token inválido: {}", e)))?;

    Uuid::parse_str(&token_data.claims.sid).map_err(|_| AppError::Jwt("Id de sesión inválido".to_string()))
}

/// Extraer el valor de la cookie de sesión de un header `Cookie`
pub fn extract_session_cookie(cookie_header: &str) -> Option<&str> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` para abrir la sesión
pub fn session_cookie(token: &str, config: &JwtConfig) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        config.expiration_hours.max(0) * 3600
    )
}

/// `Set-Cookie` que expira la sesión en el navegador
pub fn expired_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}
