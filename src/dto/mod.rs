//! DTOs de la API
//!
//! Cuerpos de petición y respuesta que viajan entre el cliente y el servidor.

pub mod auth_dto;
pub mod request_dto;

pub use auth_dto::{ErrorBody, LoginRequest, LoginResponse, SignupRequest};
pub use request_dto::{FieldUpdate, FieldUpdateRequest, SaveRequestPayload, WriteAck};
