//! Cliente HTTP para la API de GearGuard
//!
//! Todas las peticiones son JSON y llevan la cookie de sesión: el cliente
//! reqwest mantiene su propio cookie store, así que una instancia equivale a
//! una sesión de navegador.

use async_trait::async_trait;
use http::StatusCode;
use reqwest::{Client, Response};

use super::GearGuardApi;
use crate::config::ClientConfig;
use crate::dto::{ErrorBody, FieldUpdate, LoginRequest, LoginResponse, SaveRequestPayload, SignupRequest, WriteAck};
use crate::models::{DashboardData, RequestId, RequestRecord, SessionUser};
use crate::utils::errors::{ClientError, ClientResult, AUTH_FAILED_MESSAGE};

/// Cliente HTTP con cookie store (una sesión por instancia)
#[derive(Clone)]
pub struct HttpGearGuardClient {
    client: Client,
    base_url: String,
}

impl HttpGearGuardClient {
    /// Crear nuevo cliente HTTP con la URL base y el timeout configurados
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Transport(format!("Error creando cliente HTTP: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request_url(&self, prefix: &str, id: &RequestId) -> String {
        self.url(&format!("{}/{}", prefix, urlencoding::encode(id.as_str())))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> ClientResult<Response> {
        request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))
    }

    /// Deja pasar respuestas 2xx y convierte el resto en `ClientError`
    async fn check(response: Response, auth_endpoint: bool) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        let message = body.user_message();

        if auth_endpoint {
            return Err(ClientError::Authentication(
                message.unwrap_or_else(|| AUTH_FAILED_MESSAGE.to_string()),
            ));
        }

        Err(match status {
            StatusCode::UNAUTHORIZED => {
                ClientError::Unauthorized(message.unwrap_or_else(|| "Session expired".to_string()))
            }
            StatusCode::NOT_FOUND => ClientError::NotFound(message.unwrap_or_else(|| "Not found".to_string())),
            other => ClientError::Server {
                status: other.as_u16(),
                message: message.unwrap_or_else(|| other.to_string()),
            },
        })
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> ClientResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl GearGuardApi for HttpGearGuardClient {
    async fn login(&self, request: &LoginRequest) -> ClientResult<SessionUser> {
        log::info!("🔐 Iniciando sesión para: {}", request.email);
        let response = self.send(self.client.post(self.url("/login")).json(request)).await?;
        let response = Self::check(response, true).await?;
        let body: LoginResponse = Self::decode(response).await?;
        Ok(SessionUser(body.user))
    }

    async fn signup(&self, request: &SignupRequest) -> ClientResult<()> {
        log::info!("📝 Registrando cuenta: {}", request.email);
        let response = self.send(self.client.post(self.url("/signup")).json(request)).await?;
        Self::check(response, true).await?;
        Ok(())
    }

    async fn logout(&self) -> ClientResult<()> {
        let response = self.send(self.client.post(self.url("/logout"))).await?;
        Self::check(response, false).await?;
        Ok(())
    }

    async fn fetch_dashboard(&self) -> ClientResult<DashboardData> {
        let response = self.send(self.client.get(self.url("/api/equipment-data"))).await?;
        let response = Self::check(response, false).await?;
        let data: DashboardData = Self::decode(response).await?;
        log::debug!("📋 Dashboard recibido: {} solicitudes", data.requests.len());
        Ok(data)
    }

    async fn fetch_request(&self, id: &RequestId) -> ClientResult<RequestRecord> {
        let response = self.send(self.client.get(self.request_url("/api/request", id))).await?;
        let response = Self::check(response, false).await?;
        Self::decode(response).await
    }

    async fn update_field(&self, update: &FieldUpdate) -> ClientResult<()> {
        let response = self
            .send(self.client.post(self.url("/api/request/update")).json(update))
            .await?;
        Self::check(response, false).await?;
        Ok(())
    }

    async fn save_request(&self, payload: &SaveRequestPayload) -> ClientResult<Option<RequestId>> {
        let response = self
            .send(self.client.post(self.url("/api/request/save")).json(payload))
            .await?;
        let response = Self::check(response, false).await?;
        // El cuerpo es opcional: un 2xx sin JSON también es un guardado correcto
        let ack = response.json::<WriteAck>().await.ok();
        Ok(ack.and_then(|a| a.id))
    }

    async fn delete_request(&self, id: &RequestId) -> ClientResult<()> {
        let response = self
            .send(self.client.post(self.request_url("/api/request/delete", id)))
            .await?;
        Self::check(response, false).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_are_joined_and_ids_encoded() {
        let client = HttpGearGuardClient::new(&ClientConfig::new("http://localhost:5000/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/login"), "http://localhost:5000/login");
        assert_eq!(
            client.request_url("/api/request", &RequestId::new("a b/c")),
            "http://localhost:5000/api/request/a%20b%2Fc"
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Puerto 9 (discard) en loopback: nadie escucha
        let client = HttpGearGuardClient::new(&ClientConfig::new("http://127.0.0.1:9")).unwrap();
        let err = client.fetch_dashboard().await.unwrap_err();
        assert!(err.is_transport(), "unexpected error: {:?}", err);
    }
}
