//! Editor de solicitudes (modal)
//!
//! Máquina de estados con tres ejes independientes:
//! - abierto / cerrado
//! - bloqueado / desbloqueado (el desbloqueo es explícito y no se revierte
//!   hasta cerrar)
//! - pestaña activa (notas o instrucciones) ligada al área de texto compartida
//!
//! Con el editor desbloqueado y un id asignado, cada cambio de campo encola un
//! autoguardado de ese campo en la `WriteQueue`. Un borrador nuevo acumula los
//! cambios en local hasta que `save` le asigna un id.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::write_queue::{WriteOutcome, WriteQueue};
use crate::clients::GearGuardApi;
use crate::dto::{FieldUpdate, SaveRequestPayload};
use crate::models::{Priority, RequestDraft, RequestField, RequestId, Stage};
use crate::utils::errors::{ClientError, ClientResult};

pub const DELETE_CONFIRMATION: &str = "Are you sure?";

/// Pestaña del área de texto compartida
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorTab {
    #[default]
    Notes,
    Instructions,
}

impl EditorTab {
    pub fn field(&self) -> RequestField {
        match self {
            EditorTab::Notes => RequestField::Notes,
            EditorTab::Instructions => RequestField::Instructions,
        }
    }
}

/// Estado serializable del modal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorState {
    pub open: bool,
    pub request_id: Option<RequestId>,
    pub draft: RequestDraft,
    pub locked: bool,
    pub tab: EditorTab,
    /// Errores de autoguardado por campo (en línea, no bloqueantes)
    pub field_errors: BTreeMap<RequestField, String>,
    /// Último error de carga, guardado o borrado
    pub last_error: Option<String>,
    /// Época de la sesión del modal; crece con cada apertura
    pub session: u64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            open: false,
            request_id: None,
            draft: RequestDraft::default(),
            locked: false,
            tab: EditorTab::Notes,
            field_errors: BTreeMap::new(),
            last_error: None,
            session: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Cancelled,
    Deleted,
}

pub struct RequestEditor {
    api: Arc<dyn GearGuardApi>,
    writes: WriteQueue,
    outcomes: mpsc::UnboundedReceiver<WriteOutcome>,
    state: EditorState,
}

impl RequestEditor {
    pub fn new(api: Arc<dyn GearGuardApi>) -> Self {
        let (writes, outcomes) = WriteQueue::new(api.clone());
        Self {
            api,
            writes,
            outcomes,
            state: EditorState::default(),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.open
    }

    pub fn is_locked(&self) -> bool {
        self.state.locked
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.state.request_id.as_ref()
    }

    pub fn draft(&self) -> &RequestDraft {
        &self.state.draft
    }

    pub fn active_tab(&self) -> EditorTab {
        self.state.tab
    }

    /// Reinicia el estado para una sesión nueva del modal
    fn begin_session(&mut self) {
        let session = self.state.session + 1;
        self.state = EditorState {
            session,
            ..EditorState::default()
        };
        // Resultados de sesiones anteriores ya no interesan
        while self.outcomes.try_recv().is_ok() {}
    }

    /// Abre un borrador en blanco, desbloqueado
    pub fn open_new(&mut self) {
        self.begin_session();
        self.state.open = true;
        self.state.locked = false;
        log::info!("🆕 Editor abierto con borrador nuevo (sesión {})", self.state.session);
    }

    /// Abre una solicitud existente en modo bloqueado. El borrador se reemplaza entero.
    pub async fn open_existing(&mut self, id: RequestId) -> ClientResult<()> {
        self.begin_session();
        let session = self.state.session;

        match self.api.fetch_request(&id).await {
            Ok(record) => {
                self.state = EditorState {
                    open: true,
                    request_id: Some(id),
                    draft: RequestDraft::from(&record),
                    locked: true,
                    session,
                    ..EditorState::default()
                };
                log::info!("📂 Solicitud {:?} abierta en modo lectura", self.state.request_id);
                Ok(())
            }
            Err(e) => {
                log::error!("❌ Error cargando solicitud {}: {}", id, e);
                self.state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Desbloquea la edición. Solo se vuelve a bloquear cerrando el modal.
    pub fn unlock(&mut self) -> ClientResult<()> {
        if !self.state.open {
            return Err(ClientError::NotOpen);
        }
        self.state.locked = false;
        Ok(())
    }

    /// Cambia la pestaña; el texto de la otra pestaña se conserva
    pub fn select_tab(&mut self, tab: EditorTab) {
        self.state.tab = tab;
    }

    /// Contenido del área de texto para la pestaña activa
    pub fn text_area_value(&self) -> &str {
        match self.state.tab {
            EditorTab::Notes => &self.state.draft.notes,
            EditorTab::Instructions => &self.state.draft.instructions,
        }
    }

    pub fn edit_text_area(&mut self, value: impl Into<String>) -> ClientResult<()> {
        let field = self.state.tab.field();
        self.change_field(field, value)
    }

    /// Cambia un campo del borrador y, si hay id, encola su autoguardado.
    ///
    /// El autoguardado corre en una tarea tokio: fuera de un runtime devuelve
    /// `ClientError::NoRuntime` con el borrador ya modificado.
    pub fn change_field(&mut self, field: RequestField, value: impl Into<String>) -> ClientResult<()> {
        if !self.state.open {
            return Err(ClientError::NotOpen);
        }
        if self.state.locked {
            return Err(ClientError::Locked);
        }

        let value = value.into();
        let previous_target = self.state.draft.target.target_type();
        self.state.draft.apply(field, &value)?;
        self.state.field_errors.remove(&field);

        let Some(id) = self.state.request_id.clone() else {
            return Ok(());
        };
        self.writes.enqueue_field(
            self.state.session,
            FieldUpdate { id: id.clone(), field, value },
        )?;

        // Cambiar de tipo vacía el id activo; el servidor debe quedar igual
        if self.state.draft.target.target_type() != previous_target {
            let id_field = self.state.draft.target.id_field();
            self.writes.enqueue_field(
                self.state.session,
                FieldUpdate { id, field: id_field, value: String::new() },
            )?;
        }
        Ok(())
    }

    pub fn set_stage(&mut self, stage: Stage) -> ClientResult<()> {
        self.change_field(RequestField::Stage, stage.as_str())
    }

    pub fn set_priority(&mut self, priority: Priority) -> ClientResult<()> {
        self.change_field(RequestField::Priority, priority.as_str())
    }

    /// Guarda el borrador completo y cierra el modal. Devuelve el id conocido
    /// del registro (el del servidor para borradores nuevos, si lo informa).
    pub async fn save(&mut self) -> ClientResult<Option<RequestId>> {
        if !self.state.open {
            return Err(ClientError::NotOpen);
        }
        if self.state.locked {
            return Err(ClientError::Locked);
        }

        let current_id = self.state.request_id.clone();
        let payload = SaveRequestPayload {
            record: self.state.draft.to_record(None),
            request_id: current_id.clone(),
        };

        match self.writes.save(payload).await {
            Ok(assigned) => {
                let id = assigned.or(current_id);
                log::info!("💾 Solicitud guardada: {:?}", id);
                self.close();
                Ok(id)
            }
            Err(e) => {
                log::error!("❌ Error guardando solicitud: {}", e);
                self.state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Borra la solicitud abierta tras pedir confirmación
    pub async fn delete<F>(&mut self, confirm: F) -> ClientResult<DeleteOutcome>
    where
        F: FnOnce(&str) -> bool,
    {
        if !self.state.open {
            return Err(ClientError::NotOpen);
        }
        let id = self.state.request_id.clone().ok_or(ClientError::MissingId)?;

        if !confirm(DELETE_CONFIRMATION) {
            log::info!("↩️ Borrado de {} cancelado", id);
            return Ok(DeleteOutcome::Cancelled);
        }

        match self.writes.delete(&id).await {
            Ok(()) => {
                self.close();
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) => {
                log::error!("❌ Error borrando solicitud {}: {}", id, e);
                self.state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Cierra el modal y descarta el borrador. Las escrituras ya encoladas
    /// siguen su curso; sus resultados se ignoran.
    pub fn close(&mut self) {
        let session = self.state.session;
        self.state = EditorState {
            session,
            ..EditorState::default()
        };
    }

    /// Incorpora los resultados de autoguardado de la sesión actual
    pub fn sync_status(&mut self) -> &BTreeMap<RequestField, String> {
        while let Ok(outcome) = self.outcomes.try_recv() {
            let current = self.state.open
                && outcome.session == self.state.session
                && self.state.request_id.as_ref() == Some(&outcome.id);
            if !current {
                continue;
            }

            match outcome.result {
                Ok(()) => {
                    self.state.field_errors.remove(&outcome.field);
                }
                Err(e) => {
                    self.state.field_errors.insert(outcome.field, e.to_string());
                }
            }
        }
        &self.state.field_errors
    }

    /// Espera a que terminen los autoguardados pendientes del registro abierto
    pub async fn flush(&mut self) -> ClientResult<()> {
        if let Some(id) = self.state.request_id.clone() {
            self.writes.flush(&id).await?;
        }
        self.sync_status();
        Ok(())
    }

    /// Carriles de escritura con trabajo pendiente
    pub fn active_lanes(&self) -> usize {
        self.writes.active_lanes()
    }
}
