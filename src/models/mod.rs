//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos compartidos entre el cliente y el
//! servidor de referencia: solicitudes de mantenimiento, vista agregada del
//! dashboard y credenciales de sesión.

pub mod auth;
pub mod dashboard;
pub mod request;

pub use auth::{AuthMode, Credentials, SessionOutcome, SessionUser};
pub use dashboard::{CatalogEntry, DashboardData, EquipmentEntry, KpiSnapshot, OptionCatalogs, TechnicianEntry};
pub use request::{
    MaintenanceTarget, MaintenanceType, Priority, RequestDraft, RequestField, RequestId, RequestRecord, Stage,
    TargetType,
};
