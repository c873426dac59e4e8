//! Cargador de datos del dashboard
//!
//! Recarga completa de `/api/equipment-data` al montar y después de cada
//! escritura. Si la recarga falla se conservan los datos anteriores.

use std::sync::Arc;

use crate::clients::GearGuardApi;
use crate::models::DashboardData;
use crate::utils::errors::ClientResult;

pub struct DashboardLoader {
    api: Arc<dyn GearGuardApi>,
    data: DashboardData,
    last_error: Option<String>,
    loaded: bool,
}

impl DashboardLoader {
    pub fn new(api: Arc<dyn GearGuardApi>) -> Self {
        Self {
            api,
            data: DashboardData::default(),
            last_error: None,
            loaded: false,
        }
    }

    pub fn data(&self) -> &DashboardData {
        &self.data
    }

    /// Error de la última recarga, si falló
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Si alguna recarga ha tenido éxito
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub async fn reload(&mut self) -> ClientResult<&DashboardData> {
        match self.api.fetch_dashboard().await {
            Ok(data) => {
                log::info!(
                    "🔄 Dashboard recargado: {} solicitudes, {} abiertas",
                    data.requests.len(),
                    data.kpi.open_requests
                );
                self.data = data;
                self.last_error = None;
                self.loaded = true;
                Ok(&self.data)
            }
            Err(e) => {
                tracing::warn!("⚠️ Error recargando dashboard, se mantienen los datos anteriores: {}", e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}
