// ============================================================================
// APP VIEWMODEL - COMPOSICIÓN RAÍZ
// ============================================================================
// El estado de sesión decide entre el formulario de acceso y el shell con la
// página activa. El logout siempre vuelve al formulario.
// ============================================================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::auth_form::AuthFormViewModel;
use super::dashboard_viewmodel::DashboardViewModel;
use super::navigation::NavigationState;
use crate::clients::GearGuardApi;
use crate::models::SessionUser;
use crate::services::SessionService;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum AppView {
    Auth,
    Shell { user: SessionUser },
}

pub struct AppViewModel {
    api: Arc<dyn GearGuardApi>,
    session: SessionService,
    view: AppView,
    auth_form: AuthFormViewModel,
    navigation: NavigationState,
    dashboard: Option<DashboardViewModel>,
}

impl AppViewModel {
    pub fn new(api: Arc<dyn GearGuardApi>) -> Self {
        let session = SessionService::new(api.clone());
        Self {
            api,
            auth_form: AuthFormViewModel::new(session.clone()),
            session,
            view: AppView::Auth,
            navigation: NavigationState::default(),
            dashboard: None,
        }
    }

    pub fn view(&self) -> &AppView {
        &self.view
    }

    pub fn auth_form(&self) -> &AuthFormViewModel {
        &self.auth_form
    }

    pub fn auth_form_mut(&mut self) -> &mut AuthFormViewModel {
        &mut self.auth_form
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn navigation_mut(&mut self) -> &mut NavigationState {
        &mut self.navigation
    }

    pub fn dashboard(&self) -> Option<&DashboardViewModel> {
        self.dashboard.as_ref()
    }

    pub fn dashboard_mut(&mut self) -> Option<&mut DashboardViewModel> {
        self.dashboard.as_mut()
    }

    /// Envía el formulario de acceso; con login correcto monta el shell
    pub async fn submit_auth(&mut self) -> &AppView {
        if let Some(user) = self.auth_form.submit().await {
            self.mount_shell(user).await;
        }
        &self.view
    }

    async fn mount_shell(&mut self, user: SessionUser) {
        log::info!("🏠 Montando shell para {}", user.display_name());
        let mut dashboard = DashboardViewModel::new(self.api.clone());
        dashboard.mount().await;
        self.dashboard = Some(dashboard);
        self.navigation = NavigationState::default();
        self.view = AppView::Shell { user };
    }

    /// Termina la sesión y vuelve al formulario pase lo que pase
    pub async fn logout(&mut self) -> &AppView {
        self.session.logout().await;
        self.dashboard = None;
        self.navigation = NavigationState::default();
        self.view = AppView::Auth;
        log::info!("👋 Sesión terminada");
        &self.view
    }
}
