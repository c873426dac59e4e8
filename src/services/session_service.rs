//! Cliente de sesión
//!
//! Envía el formulario de login/registro y termina la sesión. La validación
//! local (campos obligatorios, contraseñas que coinciden) ocurre antes de
//! tocar la red.

use std::sync::Arc;

use validator::Validate;

use crate::clients::GearGuardApi;
use crate::dto::{LoginRequest, SignupRequest};
use crate::models::{AuthMode, Credentials, SessionOutcome};
use crate::utils::errors::{ClientError, ClientResult};

pub const PASSWORD_MISMATCH: &str = "Passwords do not match!";

#[derive(Clone)]
pub struct SessionService {
    api: Arc<dyn GearGuardApi>,
}

impl SessionService {
    pub fn new(api: Arc<dyn GearGuardApi>) -> Self {
        Self { api }
    }

    /// Valida las credenciales para el modo dado sin hacer ninguna llamada
    pub fn validate(mode: AuthMode, credentials: &Credentials) -> ClientResult<()> {
        if mode == AuthMode::Signup {
            if !credentials.passwords_match() {
                return Err(ClientError::Validation(PASSWORD_MISMATCH.to_string()));
            }
            if credentials.name.as_deref().map(str::trim).unwrap_or_default().is_empty() {
                return Err(ClientError::Validation("Full name is required".to_string()));
            }
        }
        credentials.validate()?;
        Ok(())
    }

    /// Envía las credenciales a `/login` o `/signup`
    pub async fn submit(&self, mode: AuthMode, credentials: &Credentials) -> ClientResult<SessionOutcome> {
        Self::validate(mode, credentials)?;

        match mode {
            AuthMode::Login => {
                let user = self.api.login(&LoginRequest::from(credentials)).await?;
                log::info!("✅ Sesión iniciada: {}", user.display_name());
                Ok(SessionOutcome::LoggedIn(user))
            }
            AuthMode::Signup => {
                self.api.signup(&SignupRequest::from(credentials)).await?;
                log::info!("✅ Cuenta creada para {}", credentials.email);
                Ok(SessionOutcome::SignedUp)
            }
        }
    }

    /// Termina la sesión en el servidor. Un fallo se registra y se ignora:
    /// desde el cliente el logout siempre tiene éxito.
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            log::warn!("⚠️ Logout falló, se vuelve a la entrada igualmente: {}", e);
        }
    }
}
