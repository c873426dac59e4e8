//! Modelos del dashboard
//!
//! Vista agregada que devuelve `/api/equipment-data`: solicitudes, KPIs y los
//! catálogos de opciones que alimentan los selectores del editor.

use serde::{Deserialize, Serialize};

use super::request::{MaintenanceType, RequestRecord, Stage};

/// Snapshot de KPIs calculado por el servidor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiSnapshot {
    /// Equipos con salud < 30%
    pub critical_count: u32,
    /// Carga media de técnicos, en porcentaje
    pub tech_load: u32,
    pub open_requests: u32,
    pub overdue: u32,
}

/// Entrada genérica de catálogo (equipos de trabajo, centros, empresas)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Salud del equipo en porcentaje
    pub health: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicianEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub current_load: u32,
}

/// Catálogos de solo lectura para los selectores
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionCatalogs {
    pub equipment: Vec<EquipmentEntry>,
    pub teams: Vec<CatalogEntry>,
    #[serde(rename = "users")]
    pub technicians: Vec<TechnicianEntry>,
    pub work_centers: Vec<CatalogEntry>,
    pub companies: Vec<CatalogEntry>,
}

/// Respuesta completa de `/api/equipment-data`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardData {
    pub requests: Vec<RequestRecord>,
    pub kpi: KpiSnapshot,
    #[serde(flatten)]
    pub options: OptionCatalogs,
}

/// Columna del tablero KanBan
#[derive(Debug, Clone, PartialEq)]
pub struct StageColumn<'a> {
    pub stage: Stage,
    pub requests: Vec<&'a RequestRecord>,
}

impl DashboardData {
    /// Filtro de la caja de búsqueda: asunto, empleado o técnico, sin distinguir mayúsculas
    pub fn search(&self, query: &str) -> Vec<&RequestRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.requests.iter().collect();
        }

        self.requests
            .iter()
            .filter(|r| {
                r.subject.to_lowercase().contains(&needle)
                    || r.technician.to_lowercase().contains(&needle)
                    || r
                        .employee
                        .as_deref()
                        .map(|e| e.to_lowercase().contains(&needle))
                        .unwrap_or(false)
            })
            .collect()
    }

    pub fn requests_by_stage(&self) -> Vec<StageColumn<'_>> {
        Stage::ALL
            .into_iter()
            .map(|stage| StageColumn {
                stage,
                requests: self.requests.iter().filter(|r| r.stage == stage).collect(),
            })
            .collect()
    }

    /// Solicitudes preventivas (página de calendario)
    pub fn preventive_requests(&self) -> Vec<&RequestRecord> {
        self.requests
            .iter()
            .filter(|r| r.m_type == MaintenanceType::Preventive)
            .collect()
    }

    pub fn equipment_name(&self, id: &str) -> Option<&str> {
        self.options
            .equipment
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.name.as_str())
    }

    pub fn work_center_name(&self, id: &str) -> Option<&str> {
        self.options
            .work_centers
            .iter()
            .find(|w| w.id == id)
            .map(|w| w.name.as_str())
    }
}
