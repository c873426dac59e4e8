use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::auth::Credentials;

// Login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl From<&Credentials> for LoginRequest {
    fn from(credentials: &Credentials) -> Self {
        Self {
            email: credentials.email.clone(),
            password: credentials.password.clone(),
        }
    }
}

// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: String,
}

// Signup request: la repetición de contraseña viaja para que el servidor también la compruebe
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retype_password: Option<String>,
}

impl From<&Credentials> for SignupRequest {
    fn from(credentials: &Credentials) -> Self {
        Self {
            name: credentials.name.clone().unwrap_or_default(),
            email: credentials.email.clone(),
            password: credentials.password.clone(),
            retype_password: credentials.retype_password.clone(),
        }
    }
}

// Cuerpo de error tal como lo devuelve el servidor ({error, message, code})
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
    pub code: Option<String>,
}

impl ErrorBody {
    /// Mensaje para el usuario: `message` primero, luego `error`
    pub fn user_message(&self) -> Option<String> {
        self.message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .or_else(|| self.error.clone().filter(|e| !e.trim().is_empty()))
    }
}
