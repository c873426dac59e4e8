//! Repositorios del servidor de referencia

pub mod maintenance_repository;

pub use maintenance_repository::{MaintenanceRepository, StoredUser};
