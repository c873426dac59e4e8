// ============================================================================
// DASHBOARD VIEWMODEL - DATOS + EDITOR
// ============================================================================
// Une el cargador del dashboard con el editor de solicitudes: toda escritura
// correcta va seguida de una recarga completa.
// ============================================================================

use std::sync::Arc;

use crate::clients::GearGuardApi;
use crate::models::{DashboardData, RequestId, RequestRecord};
use crate::services::{DashboardLoader, DeleteOutcome, RequestEditor};
use crate::utils::errors::ClientResult;

pub struct DashboardViewModel {
    loader: DashboardLoader,
    editor: RequestEditor,
    query: String,
}

impl DashboardViewModel {
    pub fn new(api: Arc<dyn GearGuardApi>) -> Self {
        Self {
            loader: DashboardLoader::new(api.clone()),
            editor: RequestEditor::new(api),
            query: String::new(),
        }
    }

    pub fn data(&self) -> &DashboardData {
        self.loader.data()
    }

    pub fn loader(&self) -> &DashboardLoader {
        &self.loader
    }

    pub fn editor(&self) -> &RequestEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut RequestEditor {
        &mut self.editor
    }

    /// Carga inicial al montar la vista
    pub async fn mount(&mut self) {
        // El error queda en `loader.last_error()`
        let _ = self.loader.reload().await;
    }

    pub async fn refresh(&mut self) -> ClientResult<&DashboardData> {
        self.loader.reload().await
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Solicitudes visibles según la caja de búsqueda
    pub fn visible_requests(&self) -> Vec<&RequestRecord> {
        self.loader.data().search(&self.query)
    }

    pub fn new_request(&mut self) {
        self.editor.open_new();
    }

    pub async fn open_request(&mut self, id: RequestId) -> ClientResult<()> {
        self.editor.open_existing(id).await
    }

    /// Guarda el borrador y recarga el dashboard
    pub async fn save(&mut self) -> ClientResult<Option<RequestId>> {
        let id = self.editor.save().await?;
        let _ = self.loader.reload().await;
        Ok(id)
    }

    /// Borra la solicitud abierta (con confirmación) y recarga si se borró
    pub async fn delete<F>(&mut self, confirm: F) -> ClientResult<DeleteOutcome>
    where
        F: FnOnce(&str) -> bool,
    {
        let outcome = self.editor.delete(confirm).await?;
        if outcome == DeleteOutcome::Deleted {
            let _ = self.loader.reload().await;
        }
        Ok(outcome)
    }

    /// Cierra el editor; si había autoguardados, recarga para reflejarlos
    pub async fn close_editor(&mut self) {
        let autosaved = self.editor.request_id().is_some() && !self.editor.is_locked();
        if autosaved {
            if let Err(e) = self.editor.flush().await {
                log::warn!("⚠️ Autoguardados pendientes no confirmados: {}", e);
            }
        }
        self.editor.close();
        if autosaved {
            let _ = self.loader.reload().await;
        }
    }
}
