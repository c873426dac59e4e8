//! Clients - HTTP clients for the GearGuard API
//!
//! `GearGuardApi` es la costura entre la lógica de vista y la red: los view
//! models y servicios dependen del trait, `HttpGearGuardClient` lo implementa
//! sobre reqwest y los tests lo sustituyen por fakes en memoria.

pub mod http_client;

use async_trait::async_trait;

use crate::dto::{FieldUpdate, LoginRequest, SaveRequestPayload, SignupRequest};
use crate::models::{DashboardData, RequestId, RequestRecord, SessionUser};
use crate::utils::errors::ClientResult;

pub use http_client::HttpGearGuardClient;

/// Llamadas de la API externa, una por endpoint
#[async_trait]
pub trait GearGuardApi: Send + Sync {
    /// POST /login
    async fn login(&self, request: &LoginRequest) -> ClientResult<SessionUser>;

    /// POST /signup
    async fn signup(&self, request: &SignupRequest) -> ClientResult<()>;

    /// POST /logout
    async fn logout(&self) -> ClientResult<()>;

    /// GET /api/equipment-data
    async fn fetch_dashboard(&self) -> ClientResult<DashboardData>;

    /// GET /api/request/{id}
    async fn fetch_request(&self, id: &RequestId) -> ClientResult<RequestRecord>;

    /// POST /api/request/update
    async fn update_field(&self, update: &FieldUpdate) -> ClientResult<()>;

    /// POST /api/request/save. Devuelve el id si el servidor lo informa.
    async fn save_request(&self, payload: &SaveRequestPayload) -> ClientResult<Option<RequestId>>;

    /// POST /api/request/delete/{id}
    async fn delete_request(&self, id: &RequestId) -> ClientResult<()>;
}
