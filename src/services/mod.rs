//! Services module
//!
//! Lógica de cliente y de negocio: sesión, carga del dashboard, editor de
//! solicitudes con su cola de escrituras, y el cálculo de KPIs que comparte
//! el servidor de referencia.

pub mod dashboard_service;
pub mod kpi_service;
pub mod request_editor;
pub mod session_service;
pub mod write_queue;

pub use dashboard_service::DashboardLoader;
pub use request_editor::{DeleteOutcome, EditorState, EditorTab, RequestEditor, DELETE_CONFIRMATION};
pub use session_service::{SessionService, PASSWORD_MISMATCH};
pub use write_queue::{WriteOutcome, WriteQueue};
