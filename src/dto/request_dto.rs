use serde::{Deserialize, Serialize};

use crate::models::request::{RequestField, RequestId, RequestRecord};

// Autoguardado de un campo (lado cliente, tipado)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldUpdate {
    pub id: RequestId,
    pub field: RequestField,
    pub value: String,
}

// Autoguardado de un campo tal como llega al servidor: todo opcional para poder responder "Missing data"
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FieldUpdateRequest {
    pub id: Option<String>,
    pub field: Option<String>,
    pub value: String,
}

// Upsert: borrador completo + request_id (ausente para crear)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRequestPayload {
    #[serde(flatten)]
    pub record: RequestRecord,
    #[serde(default)]
    pub request_id: Option<RequestId>,
}

// Confirmación de escritura
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteAck {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
}

impl WriteAck {
    pub fn ok() -> Self {
        Self { success: true, id: None }
    }

    pub fn with_id(id: RequestId) -> Self {
        Self { success: true, id: Some(id) }
    }
}
