//! Repositorio en memoria del servidor de referencia
//!
//! Guarda usuarios, solicitudes y catálogos detrás de un `RwLock` de tokio.
//! Los clones comparten el mismo almacén.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    CatalogEntry, EquipmentEntry, KpiSnapshot, MaintenanceType, OptionCatalogs, RequestField, RequestId, RequestRecord,
    Stage, TechnicianEntry,
};
use crate::services::kpi_service;
use crate::utils::errors::{bad_request_error, conflict_error, not_found_error, AppResult};

/// Usuario registrado
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Default)]
struct StoreData {
    users: HashMap<String, StoredUser>,
    // Orden de inserción, como lo lista el dashboard
    requests: Vec<RequestRecord>,
    catalogs: OptionCatalogs,
}

impl StoreData {
    fn request_mut(&mut self, id: &str) -> AppResult<&mut RequestRecord> {
        self.requests
            .iter_mut()
            .find(|r| has_id(r, id))
            .ok_or_else(|| not_found_error("Request", id))
    }
}

fn has_id(record: &RequestRecord, id: &str) -> bool {
    record.id.as_ref().map(RequestId::as_str) == Some(id)
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Clone, Default)]
pub struct MaintenanceRepository {
    data: Arc<RwLock<StoreData>>,
}

impl MaintenanceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Almacén con catálogos y una solicitud de ejemplo para desarrollo local
    pub async fn with_demo_data() -> Self {
        let repository = Self::new();
        repository.set_catalogs(demo_catalogs()).await;

        let now = Utc::now();
        let demo = RequestRecord {
            id: Some(RequestId::new("650000000000000000000001")),
            subject: "Test - Conveyor Belt Jam".to_string(),
            stage: Stage::InProgress,
            equipment_id: "eq-conveyor-05".to_string(),
            category: "Machinery".to_string(),
            m_type: MaintenanceType::Corrective,
            technician: "Aka Foster".to_string(),
            scheduled_date: (now + chrono::Duration::days(1)).format("%Y-%m-%d %H:%M").to_string(),
            duration: "02:30".to_string(),
            company: "My Company".to_string(),
            notes: "Initial technician notes: The belt seems to be misaligned...".to_string(),
            employee: Some("Mitchell Admin".to_string()),
            ..RequestRecord::default()
        };
        repository.data.write().await.requests.push(demo);

        repository
    }

    pub async fn set_catalogs(&self, catalogs: OptionCatalogs) {
        self.data.write().await.catalogs = catalogs;
    }

    pub async fn catalogs(&self) -> OptionCatalogs {
        self.data.read().await.catalogs.clone()
    }

    /// Registra un usuario; el email es único sin distinguir mayúsculas
    pub async fn insert_user(&self, name: &str, email: &str, password_hash: String) -> AppResult<StoredUser> {
        let key = email_key(email);
        let mut data = self.data.write().await;
        if data.users.contains_key(&key) {
            return Err(conflict_error("User", "email", email));
        }

        let user = StoredUser {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: key.clone(),
            password_hash,
        };
        data.users.insert(key, user.clone());
        Ok(user)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Option<StoredUser> {
        self.data.read().await.users.get(&email_key(email)).cloned()
    }

    pub async fn list_requests(&self) -> Vec<RequestRecord> {
        self.data
            .read()
            .await
            .requests
            .clone()
    }

    pub async fn get_request(&self, id: &str) -> AppResult<RequestRecord> {
        self.data
            .read()
            .await
            .requests
            .iter()
            .find(|r| has_id(r, id))
            .cloned()
            .ok_or_else(|| not_found_error("Request", id))
    }

    /// Crea una solicitud con id nuevo; `employee` es quien la registra
    pub async fn create_request(&self, mut record: RequestRecord, employee: &str) -> RequestId {
        let id = RequestId::new(Uuid::new_v4().simple().to_string());
        record.id = Some(id.clone());
        record.employee = Some(employee.to_string());

        self.data.write().await.requests.push(record);
        id
    }

    /// Reemplaza los campos editables; id y empleado se conservan
    pub async fn replace_request(&self, id: &str, record: RequestRecord) -> AppResult<()> {
        let mut data = self.data.write().await;
        let stored = data.request_mut(id)?;

        *stored = RequestRecord {
            id: stored.id.take(),
            employee: stored.employee.take(),
            ..record
        };
        Ok(())
    }

    /// Actualiza un solo campo (autoguardado)
    pub async fn update_field(&self, id: &str, field: RequestField, value: &str) -> AppResult<()> {
        let mut data = self.data.write().await;
        data.request_mut(id)?
            .apply_field(field, value)
            .map_err(|e| bad_request_error(&e.to_string()))
    }

    pub async fn delete_request(&self, id: &str) -> AppResult<()> {
        let mut data = self.data.write().await;
        let before = data.requests.len();
        data.requests.retain(|r| !has_id(r, id));
        if data.requests.len() == before {
            return Err(not_found_error("Request", id));
        }
        Ok(())
    }

    pub async fn kpis(&self, now: DateTime<Utc>) -> KpiSnapshot {
        let data = self.data.read().await;
        kpi_service::compute_kpis(
            &data.catalogs.equipment,
            &data.catalogs.technicians,
            &data.requests,
            now,
        )
    }
}

fn demo_catalogs() -> OptionCatalogs {
    OptionCatalogs {
        equipment: vec![
            EquipmentEntry { id: "eq-conveyor-05".into(), name: "Conveyor Belt 05".into(), health: 24 },
            EquipmentEntry { id: "eq-cnc-01".into(), name: "CNC Machine 01".into(), health: 78 },
            EquipmentEntry { id: "eq-press-02".into(), name: "Hydraulic Press 02".into(), health: 15 },
        ],
        teams: vec![
            CatalogEntry::new("team-mech", "Mechanics"),
            CatalogEntry::new("team-elec", "Electricians"),
        ],
        technicians: vec![
            TechnicianEntry { id: "tech-aka".into(), name: "Aka Foster".into(), current_load: 90 },
            TechnicianEntry { id: "tech-alice".into(), name: "Alice".into(), current_load: 60 },
        ],
        work_centers: vec![
            CatalogEntry::new("wc-assembly", "Assembly Line"),
            CatalogEntry::new("wc-paint", "Paint Shop"),
        ],
        companies: vec![CatalogEntry::new("co-main", "My Company")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::AppError;

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = MaintenanceRepository::new();
        repo.insert_user("Ana", "Ana@Example.com", "hash".into()).await.unwrap();
        let err = repo.insert_user("Ana 2", "ana@example.com", "hash".into()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(repo.find_user_by_email("ANA@example.com").await.is_some());
    }

    #[tokio::test]
    async fn test_create_update_replace_delete() {
        let repo = MaintenanceRepository::new();
        let id = repo
            .create_request(RequestRecord { subject: "Oil leak".into(), ..RequestRecord::default() }, "Ana")
            .await;

        repo.update_field(id.as_str(), RequestField::Technician, "Alice").await.unwrap();
        let record = repo.get_request(id.as_str()).await.unwrap();
        assert_eq!(record.technician, "Alice");
        assert_eq!(record.employee.as_deref(), Some("Ana"));

        let err = repo.update_field(id.as_str(), RequestField::Stage, "Closed").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        repo.replace_request(id.as_str(), RequestRecord { subject: "Oil leak fixed".into(), ..RequestRecord::default() })
            .await
            .unwrap();
        let record = repo.get_request(id.as_str()).await.unwrap();
        assert_eq!(record.subject, "Oil leak fixed");
        assert_eq!(record.technician, "");
        assert_eq!(record.id, Some(id.clone()));
        assert_eq!(record.employee.as_deref(), Some("Ana"));

        repo.delete_request(id.as_str()).await.unwrap();
        assert!(matches!(repo.get_request(id.as_str()).await, Err(AppError::NotFound(_))));
        assert!(matches!(repo.delete_request(id.as_str()).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_overdue_follows_scheduled_date_and_stage() {
        let repo = MaintenanceRepository::new();
        let id = repo.create_request(RequestRecord::default(), "Ana").await;
        assert_eq!(repo.kpis(Utc::now()).await.overdue, 0);

        repo.update_field(id.as_str(), RequestField::ScheduledDate, "2020-01-01 08:00")
            .await
            .unwrap();
        assert_eq!(repo.kpis(Utc::now()).await.overdue, 1);

        repo.update_field(id.as_str(), RequestField::Stage, "Done").await.unwrap();
        let kpi = repo.kpis(Utc::now()).await;
        assert_eq!(kpi.overdue, 0);
        assert_eq!(kpi.open_requests, 0);
    }

    #[tokio::test]
    async fn test_demo_data_kpis() {
        let repo = MaintenanceRepository::with_demo_data().await;
        let kpi = repo.kpis(Utc::now() - chrono::Duration::days(1)).await;
        assert_eq!(kpi.critical_count, 2);
        assert_eq!(kpi.tech_load, 75);
        assert_eq!(kpi.open_requests, 1);
        assert_eq!(kpi.overdue, 0);
    }
}
