// ============================================================================
// AUTH FORM VIEWMODEL - LOGIN / REGISTRO
// ============================================================================
// Estado del formulario de entrada. Los errores se muestran en línea.
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::models::{AuthMode, Credentials, SessionOutcome, SessionUser};
use crate::services::SessionService;

pub const SIGNUP_NOTICE: &str = "Account created. Please log in.";

/// Campos editables del formulario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Name,
    Email,
    Password,
    RetypePassword,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthFormState {
    pub mode: AuthMode,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    #[serde(skip_serializing, default)]
    pub retype_password: String,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub submitting: bool,
}

impl AuthFormState {
    /// Alterna login/registro y limpia mensajes
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        self.error = None;
        self.notice = None;
    }

    pub fn set_field(&mut self, field: AuthField, value: impl Into<String>) {
        let value = value.into();
        match field {
            AuthField::Name => self.name = value,
            AuthField::Email => self.email = value,
            AuthField::Password => self.password = value,
            AuthField::RetypePassword => self.retype_password = value,
        }
    }

    /// Credenciales del envío actual
    pub fn credentials(&self) -> Credentials {
        match self.mode {
            AuthMode::Login => Credentials::login(self.email.trim(), self.password.clone()),
            AuthMode::Signup => Credentials::signup(
                self.name.trim(),
                self.email.trim(),
                self.password.clone(),
                self.retype_password.clone(),
            ),
        }
    }

    /// Vuelve a login tras registrarse, conservando el email
    fn after_signup(&mut self) {
        self.mode = AuthMode::Login;
        self.name.clear();
        self.password.clear();
        self.retype_password.clear();
        self.error = None;
        self.notice = Some(SIGNUP_NOTICE.to_string());
    }
}

pub struct AuthFormViewModel {
    session: SessionService,
    state: AuthFormState,
}

impl AuthFormViewModel {
    pub fn new(session: SessionService) -> Self {
        Self {
            session,
            state: AuthFormState::default(),
        }
    }

    pub fn state(&self) -> &AuthFormState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AuthFormState {
        &mut self.state
    }

    /// Envía el formulario. Devuelve el usuario si se inició sesión.
    pub async fn submit(&mut self) -> Option<SessionUser> {
        let credentials = self.state.credentials();
        self.state.submitting = true;
        self.state.error = None;
        self.state.notice = None;

        let result = self.session.submit(self.state.mode, &credentials).await;
        self.state.submitting = false;

        match result {
            Ok(SessionOutcome::LoggedIn(user)) => {
                self.state = AuthFormState::default();
                Some(user)
            }
            Ok(SessionOutcome::SignedUp) => {
                self.state.after_signup();
                None
            }
            Err(e) => {
                log::warn!("⚠️ Formulario de acceso: {}", e);
                self.state.error = Some(e.to_string());
                None
            }
        }
    }
}
