//! GearGuard
//!
//! Cliente tipado, estado de vista y servidor de referencia para el tablero
//! de solicitudes de mantenimiento.

pub mod clients;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
pub mod viewmodels;

pub use clients::{GearGuardApi, HttpGearGuardClient};
pub use config::environment::{ClientConfig, ServerConfig};
pub use routes::build_router;
pub use state::AppState;
pub use utils::errors::{AppError, ClientError, ClientResult};
