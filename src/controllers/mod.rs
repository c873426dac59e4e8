//! Controllers del servidor de referencia
//!
//! Reglas de negocio de cada endpoint; las rutas solo extraen y delegan.

pub mod auth_controller;
pub mod request_controller;

pub use auth_controller::AuthController;
pub use request_controller::RequestController;
