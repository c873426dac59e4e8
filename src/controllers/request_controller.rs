use chrono::{DateTime, Utc};

use crate::dto::request_dto::{FieldUpdateRequest, SaveRequestPayload, WriteAck};
use crate::models::{DashboardData, RequestField, RequestRecord};
use crate::repositories::MaintenanceRepository;
use crate::utils::errors::{bad_request_error, AppResult};

pub struct RequestController {
    repository: MaintenanceRepository,
}

impl RequestController {
    pub fn new(repository: MaintenanceRepository) -> Self {
        Self { repository }
    }

    /// Vista agregada: solicitudes, KPIs y catálogos
    pub async fn dashboard(&self, now: DateTime<Utc>) -> DashboardData {
        DashboardData {
            requests: self.repository.list_requests().await,
            kpi: self.repository.kpis(now).await,
            options: self.repository.catalogs().await,
        }
    }

    pub async fn get(&self, id: &str) -> AppResult<RequestRecord> {
        self.repository.get_request(id).await
    }

    pub async fn update_field(&self, request: FieldUpdateRequest) -> AppResult<WriteAck> {
        let id = request.id.filter(|id| !id.trim().is_empty());
        let field = request.field.filter(|field| !field.trim().is_empty());
        let (id, field) = match (id, field) {
            (Some(id), Some(field)) => (id, field),
            _ => return Err(bad_request_error("Missing data")),
        };

        let field: RequestField = field
            .parse()
            .map_err(|_| bad_request_error(&format!("Unknown field '{}'", field)))?;

        self.repository.update_field(&id, field, &request.value).await?;
        tracing::debug!("✏️ Campo {} actualizado en {}", field, id);
        Ok(WriteAck::ok())
    }

    /// Upsert: sin `request_id` crea, con él reemplaza
    pub async fn save(&self, payload: SaveRequestPayload, employee: &str) -> AppResult<WriteAck> {
        match payload.request_id.filter(|id| !id.as_str().trim().is_empty()) {
            Some(id) => {
                self.repository.replace_request(id.as_str(), payload.record).await?;
                tracing::info!("💾 Solicitud {} guardada", id);
                Ok(WriteAck::with_id(id))
            }
            None => {
                let id = self.repository.create_request(payload.record, employee).await;
                tracing::info!("🆕 Solicitud {} creada por {}", id, employee);
                Ok(WriteAck::with_id(id))
            }
        }
    }

    pub async fn delete(&self, id: &str) -> AppResult<WriteAck> {
        self.repository.delete_request(id).await?;
        tracing::info!("🗑️ Solicitud {} eliminada", id);
        Ok(WriteAck::ok())
    }
}
