#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use gearguard::dto::{FieldUpdate, LoginRequest, SaveRequestPayload, SignupRequest};
use gearguard::models::{DashboardData, RequestId, RequestRecord, SessionUser};
use gearguard::repositories::MaintenanceRepository;
use gearguard::{build_router, AppState, ClientConfig, ClientError, ClientResult, GearGuardApi, HttpGearGuardClient, ServerConfig};

/// Llamada registrada por `RecordingApi`
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Login(String),
    Signup(String),
    Logout,
    FetchDashboard,
    FetchRequest(RequestId),
    UpdateField(FieldUpdate),
    Save(SaveRequestPayload),
    Delete(RequestId),
}

/// API falsa en memoria que registra cada llamada en orden
#[derive(Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<ApiCall>>,
    records: Mutex<HashMap<RequestId, RequestRecord>>,
    dashboards: Mutex<Vec<ClientResult<DashboardData>>>,
    pub field_delay: Mutex<Option<Duration>>,
    pub fail_logout: Mutex<bool>,
    pub fail_fields: Mutex<bool>,
    pub assigned_id: Mutex<Option<RequestId>>,
}

impl RecordingApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_record(record: RequestRecord) -> Arc<Self> {
        let api = Self::default();
        if let Some(id) = record.id.clone() {
            api.records.lock().unwrap().insert(id, record);
        }
        Arc::new(api)
    }

    /// Próximas respuestas de `fetch_dashboard`, en orden
    pub fn queue_dashboard(&self, result: ClientResult<DashboardData>) {
        self.dashboards.lock().unwrap().push(result);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Llamadas que escriben (autoguardado, guardado, borrado)
    pub fn write_calls(&self) -> Vec<ApiCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, ApiCall::UpdateField(_) | ApiCall::Save(_) | ApiCall::Delete(_)))
            .collect()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl GearGuardApi for RecordingApi {
    async fn login(&self, request: &LoginRequest) -> ClientResult<SessionUser> {
        self.record(ApiCall::Login(request.email.clone()));
        Ok(SessionUser("Mitchell Admin".to_string()))
    }

    async fn signup(&self, request: &SignupRequest) -> ClientResult<()> {
        self.record(ApiCall::Signup(request.email.clone()));
        Ok(())
    }

    async fn logout(&self) -> ClientResult<()> {
        self.record(ApiCall::Logout);
        if *self.fail_logout.lock().unwrap() {
            return Err(ClientError::Server { status: 500, message: "boom".into() });
        }
        Ok(())
    }

    async fn fetch_dashboard(&self) -> ClientResult<DashboardData> {
        self.record(ApiCall::FetchDashboard);
        let mut queued = self.dashboards.lock().unwrap();
        if queued.is_empty() {
            return Ok(DashboardData {
                requests: self.records.lock().unwrap().values().cloned().collect(),
                ..DashboardData::default()
            });
        }
        queued.remove(0)
    }

    async fn fetch_request(&self, id: &RequestId) -> ClientResult<RequestRecord> {
        self.record(ApiCall::FetchRequest(id.clone()));
        self.records
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("Request with id '{}' not found", id)))
    }

    async fn update_field(&self, update: &FieldUpdate) -> ClientResult<()> {
        let delay = *self.field_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record(ApiCall::UpdateField(update.clone()));
        if *self.fail_fields.lock().unwrap() {
            return Err(ClientError::Server { status: 500, message: "write failed".into() });
        }
        Ok(())
    }

    async fn save_request(&self, payload: &SaveRequestPayload) -> ClientResult<Option<RequestId>> {
        self.record(ApiCall::Save(payload.clone()));
        Ok(payload.request_id.clone().or_else(|| self.assigned_id.lock().unwrap().clone()))
    }

    async fn delete_request(&self, id: &RequestId) -> ClientResult<()> {
        self.record(ApiCall::Delete(id.clone()));
        self.records.lock().unwrap().remove(id);
        Ok(())
    }
}

/// Levanta el servidor de referencia en un puerto efímero y devuelve su URL
pub async fn spawn_server() -> String {
    spawn_server_with(MaintenanceRepository::new()).await
}

pub async fn spawn_server_with(repository: MaintenanceRepository) -> String {
    let config = ServerConfig {
        bcrypt_cost: 4,
        seed_demo_data: false,
        ..ServerConfig::default()
    };
    let app = build_router(AppState::new(config, repository));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Cliente HTTP real con su propio almacén de cookies
pub fn http_client(base_url: &str) -> Arc<HttpGearGuardClient> {
    Arc::new(HttpGearGuardClient::new(&ClientConfig::new(base_url)).unwrap())
}

pub fn existing_record(id: &str) -> RequestRecord {
    RequestRecord {
        id: Some(RequestId::new(id)),
        subject: "Test - Conveyor Belt Jam".into(),
        technician: "Aka Foster".into(),
        notes: "Belt misaligned".into(),
        employee: Some("Mitchell Admin".into()),
        ..RequestRecord::default()
    }
}
