//! Modelos de autenticación
//!
//! Credenciales transitorias del formulario de login/registro y el usuario de
//! sesión devuelto por el servidor.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Modo del formulario: login o registro
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    pub fn endpoint(&self) -> &'static str {
        match self {
            AuthMode::Login => "/login",
            AuthMode::Signup => "/signup",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Signup,
            AuthMode::Signup => AuthMode::Login,
        }
    }
}

/// Credenciales del formulario. Se crean por envío y se descartan después.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Credentials {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,

    pub retype_password: Option<String>,
}

impl Credentials {
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: None,
            email: email.into(),
            password: password.into(),
            retype_password: None,
        }
    }

    pub fn signup(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        retype_password: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: email.into(),
            password: password.into(),
            retype_password: Some(retype_password.into()),
        }
    }

    /// Las contraseñas coinciden (una repetición ausente cuenta como vacía)
    pub fn passwords_match(&self) -> bool {
        self.retype_password.as_deref().unwrap_or_default() == self.password
    }
}

/// Usuario de sesión: nombre visible devuelto por `/login`, solo en memoria
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionUser(pub String);

impl SessionUser {
    pub fn display_name(&self) -> &str {
        &self.0
    }
}

/// Resultado de un envío del formulario
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    LoggedIn(SessionUser),
    /// Cuenta creada; el usuario debe iniciar sesión explícitamente
    SignedUp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passwords_match() {
        assert!(Credentials::signup("Ana", "ana@example.com", "pw", "pw").passwords_match());
        assert!(!Credentials::signup("Ana", "ana@example.com", "pw", "pw2").passwords_match());
        assert!(!Credentials::login("ana@example.com", "pw").passwords_match());
    }

    #[test]
    fn test_credentials_validation() {
        assert!(Credentials::login("ana@example.com", "secret").validate().is_ok());
        assert!(Credentials::login("not-an-email", "secret").validate().is_err());
        assert!(Credentials::login("ana@example.com", "").validate().is_err());
        assert!(Credentials::signup("", "ana@example.com", "pw", "pw").validate().is_err());
    }

    #[test]
    fn test_mode_endpoints() {
        assert_eq!(AuthMode::Login.endpoint(), "/login");
        assert_eq!(AuthMode::Signup.endpoint(), "/signup");
        assert_eq!(AuthMode::Login.toggled(), AuthMode::Signup);
    }
}
