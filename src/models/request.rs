//! Modelo de Maintenance Request
//!
//! Este módulo contiene el registro de mantenimiento tal como viaja por la API
//! (`RequestRecord`, plano) y el borrador tipado que maneja el editor
//! (`RequestDraft`), donde el objetivo del mantenimiento es una unión etiquetada.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::errors::ClientError;

/// Identificador opaco asignado por el servidor (`_id`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Etapa del ticket, en el orden en que se muestran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Stage {
    #[default]
    #[serde(rename = "New Request")]
    NewRequest,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
    #[serde(rename = "Scrap")]
    Scrap,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::NewRequest, Stage::InProgress, Stage::Done, Stage::Scrap];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::NewRequest => "New Request",
            Stage::InProgress => "In Progress",
            Stage::Done => "Done",
            Stage::Scrap => "Scrap",
        }
    }

    /// Etiqueta corta del tracker de etapas ("New" en lugar de "New Request")
    pub fn short_label(&self) -> &'static str {
        match self {
            Stage::NewRequest => "New",
            other => other.as_str(),
        }
    }

    /// Una solicitud sigue abierta mientras no esté terminada ni descartada
    pub fn is_open(&self) -> bool {
        !matches!(self, Stage::Done | Stage::Scrap)
    }
}

impl FromStr for Stage {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| ClientError::Validation(format!("unknown stage '{}'", s)))
    }
}

/// Prioridad del ticket (uno a tres rombos en la vista)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn level(&self) -> usize {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

impl FromStr for Priority {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ClientError::Validation(format!("unknown priority '{}'", s)))
    }
}

/// Tipo de mantenimiento
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MaintenanceType {
    #[default]
    Corrective,
    Preventive,
}

impl MaintenanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceType::Corrective => "Corrective",
            MaintenanceType::Preventive => "Preventive",
        }
    }
}

impl FromStr for MaintenanceType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Corrective" => Ok(MaintenanceType::Corrective),
            "Preventive" => Ok(MaintenanceType::Preventive),
            other => Err(ClientError::Validation(format!("unknown maintenance type '{}'", other))),
        }
    }
}

/// Discriminante de `MaintenanceTarget` tal como viaja en `target_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    #[default]
    Equipment,
    WorkCenter,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Equipment => "equipment",
            TargetType::WorkCenter => "work_center",
        }
    }
}

impl FromStr for TargetType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equipment" => Ok(TargetType::Equipment),
            "work_center" => Ok(TargetType::WorkCenter),
            other => Err(ClientError::Validation(format!("unknown target type '{}'", other))),
        }
    }
}

/// Objetivo del mantenimiento: un equipo o un centro de trabajo, nunca ambos
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target_type", rename_all = "snake_case")]
pub enum MaintenanceTarget {
    Equipment { equipment_id: String },
    WorkCenter { work_center_id: String },
}

impl Default for MaintenanceTarget {
    fn default() -> Self {
        MaintenanceTarget::Equipment { equipment_id: String::new() }
    }
}

impl MaintenanceTarget {
    pub fn empty(target_type: TargetType) -> Self {
        match target_type {
            TargetType::Equipment => MaintenanceTarget::Equipment { equipment_id: String::new() },
            TargetType::WorkCenter => MaintenanceTarget::WorkCenter { work_center_id: String::new() },
        }
    }

    pub fn target_type(&self) -> TargetType {
        match self {
            MaintenanceTarget::Equipment { .. } => TargetType::Equipment,
            MaintenanceTarget::WorkCenter { .. } => TargetType::WorkCenter,
        }
    }

    /// Campo del id activo para esta variante
    pub fn id_field(&self) -> RequestField {
        match self {
            MaintenanceTarget::Equipment { .. } => RequestField::EquipmentId,
            MaintenanceTarget::WorkCenter { .. } => RequestField::WorkCenterId,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            MaintenanceTarget::Equipment { equipment_id } => equipment_id,
            MaintenanceTarget::WorkCenter { work_center_id } => work_center_id,
        }
    }
}

/// Nombre de campo editable, con su clave en el JSON de la API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestField {
    Subject,
    Stage,
    TargetType,
    EquipmentId,
    WorkCenterId,
    Category,
    #[serde(rename = "m_type")]
    MaintenanceType,
    Team,
    Technician,
    ScheduledDate,
    Duration,
    Priority,
    Company,
    Notes,
    Instructions,
    StatusColor,
}

impl RequestField {
    pub const ALL: [RequestField; 16] = [
        RequestField::Subject,
        RequestField::Stage,
        RequestField::TargetType,
        RequestField::EquipmentId,
        RequestField::WorkCenterId,
        RequestField::Category,
        RequestField::MaintenanceType,
        RequestField::Team,
        RequestField::Technician,
        RequestField::ScheduledDate,
        RequestField::Duration,
        RequestField::Priority,
        RequestField::Company,
        RequestField::Notes,
        RequestField::Instructions,
        RequestField::StatusColor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestField::Subject => "subject",
            RequestField::Stage => "stage",
            RequestField::TargetType => "target_type",
            RequestField::EquipmentId => "equipment_id",
            RequestField::WorkCenterId => "work_center_id",
            RequestField::Category => "category",
            RequestField::MaintenanceType => "m_type",
            RequestField::Team => "team",
            RequestField::Technician => "technician",
            RequestField::ScheduledDate => "scheduled_date",
            RequestField::Duration => "duration",
            RequestField::Priority => "priority",
            RequestField::Company => "company",
            RequestField::Notes => "notes",
            RequestField::Instructions => "instructions",
            RequestField::StatusColor => "status_color",
        }
    }
}

impl fmt::Display for RequestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestField {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequestField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ClientError::Validation(format!("unknown field '{}'", s)))
    }
}

pub const DEFAULT_STATUS_COLOR: &str = "grey";

/// Registro plano tal como lo devuelve `/api/request/{id}` y lo lista `/api/equipment-data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    pub subject: String,
    pub stage: Stage,
    pub target_type: TargetType,
    pub equipment_id: String,
    pub work_center_id: String,
    pub category: String,
    pub m_type: MaintenanceType,
    pub team: String,
    pub technician: String,
    pub scheduled_date: String,
    pub duration: String,
    pub priority: Priority,
    pub company: String,
    pub notes: String,
    pub instructions: String,
    pub status_color: String,
    /// Solo lectura: quien creó la solicitud
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<String>,
}

impl Default for RequestRecord {
    fn default() -> Self {
        Self {
            id: None,
            subject: String::new(),
            stage: Stage::default(),
            target_type: TargetType::default(),
            equipment_id: String::new(),
            work_center_id: String::new(),
            category: String::new(),
            m_type: MaintenanceType::default(),
            team: String::new(),
            technician: String::new(),
            scheduled_date: String::new(),
            duration: String::new(),
            priority: Priority::default(),
            company: String::new(),
            notes: String::new(),
            instructions: String::new(),
            status_color: DEFAULT_STATUS_COLOR.to_string(),
            employee: None,
        }
    }
}

impl RequestRecord {
    /// Aplica una actualización de un solo campo sobre el registro plano
    pub fn apply_field(&mut self, field: RequestField, value: &str) -> Result<(), ClientError> {
        match field {
            RequestField::Subject => self.subject = value.to_string(),
            RequestField::Stage => self.stage = value.parse()?,
            RequestField::TargetType => self.target_type = value.parse()?,
            RequestField::EquipmentId => self.equipment_id = value.to_string(),
            RequestField::WorkCenterId => self.work_center_id = value.to_string(),
            RequestField::Category => self.category = value.to_string(),
            RequestField::MaintenanceType => self.m_type = value.parse()?,
            RequestField::Team => self.team = value.to_string(),
            RequestField::Technician => self.technician = value.to_string(),
            RequestField::ScheduledDate => self.scheduled_date = value.to_string(),
            RequestField::Duration => self.duration = value.to_string(),
            RequestField::Priority => self.priority = value.parse()?,
            RequestField::Company => self.company = value.to_string(),
            RequestField::Notes => self.notes = value.to_string(),
            RequestField::Instructions => self.instructions = value.to_string(),
            RequestField::StatusColor => self.status_color = value.to_string(),
        }
        Ok(())
    }
}

/// Borrador que edita el modal de solicitudes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDraft {
    pub subject: String,
    pub stage: Stage,
    pub target: MaintenanceTarget,
    pub category: String,
    pub maintenance_type: MaintenanceType,
    pub team: String,
    pub technician: String,
    pub scheduled_date: String,
    pub duration: String,
    pub priority: Priority,
    pub company: String,
    pub notes: String,
    pub instructions: String,
    pub status_color: String,
}

impl Default for RequestDraft {
    fn default() -> Self {
        Self {
            subject: String::new(),
            stage: Stage::NewRequest,
            target: MaintenanceTarget::default(),
            category: String::new(),
            maintenance_type: MaintenanceType::Corrective,
            team: String::new(),
            technician: String::new(),
            scheduled_date: String::new(),
            duration: String::new(),
            priority: Priority::Low,
            company: String::new(),
            notes: String::new(),
            instructions: String::new(),
            status_color: DEFAULT_STATUS_COLOR.to_string(),
        }
    }
}

impl From<&RequestRecord> for RequestDraft {
    fn from(record: &RequestRecord) -> Self {
        let target = match record.target_type {
            TargetType::Equipment => MaintenanceTarget::Equipment {
                equipment_id: record.equipment_id.clone(),
            },
            TargetType::WorkCenter => MaintenanceTarget::WorkCenter {
                work_center_id: record.work_center_id.clone(),
            },
        };

        Self {
            subject: record.subject.clone(),
            stage: record.stage,
            target,
            category: record.category.clone(),
            maintenance_type: record.m_type,
            team: record.team.clone(),
            technician: record.technician.clone(),
            scheduled_date: record.scheduled_date.clone(),
            duration: record.duration.clone(),
            priority: record.priority,
            company: record.company.clone(),
            notes: record.notes.clone(),
            instructions: record.instructions.clone(),
            status_color: record.status_color.clone(),
        }
    }
}

impl RequestDraft {
    /// Convierte el borrador al registro plano; el id inactivo viaja vacío
    pub fn to_record(&self, id: Option<RequestId>) -> RequestRecord {
        let (equipment_id, work_center_id) = match &self.target {
            MaintenanceTarget::Equipment { equipment_id } => (equipment_id.clone(), String::new()),
            MaintenanceTarget::WorkCenter { work_center_id } => (String::new(), work_center_id.clone()),
        };

        RequestRecord {
            id,
            subject: self.subject.clone(),
            stage: self.stage,
            target_type: self.target.target_type(),
            equipment_id,
            work_center_id,
            category: self.category.clone(),
            m_type: self.maintenance_type,
            team: self.team.clone(),
            technician: self.technician.clone(),
            scheduled_date: self.scheduled_date.clone(),
            duration: self.duration.clone(),
            priority: self.priority,
            company: self.company.clone(),
            notes: self.notes.clone(),
            instructions: self.instructions.clone(),
            status_color: self.status_color.clone(),
            employee: None,
        }
    }

    /// Valor actual de un campo como texto. `None` si es el id del objetivo inactivo.
    pub fn field_value(&self, field: RequestField) -> Option<String> {
        let value = match field {
            RequestField::Subject => self.subject.clone(),
            RequestField::Stage => self.stage.as_str().to_string(),
            RequestField::TargetType => self.target.target_type().as_str().to_string(),
            RequestField::EquipmentId | RequestField::WorkCenterId => {
                if self.target.id_field() != field {
                    return None;
                }
                self.target.id().to_string()
            }
            RequestField::Category => self.category.clone(),
            RequestField::MaintenanceType => self.maintenance_type.as_str().to_string(),
            RequestField::Team => self.team.clone(),
            RequestField::Technician => self.technician.clone(),
            RequestField::ScheduledDate => self.scheduled_date.clone(),
            RequestField::Duration => self.duration.clone(),
            RequestField::Priority => self.priority.as_str().to_string(),
            RequestField::Company => self.company.clone(),
            RequestField::Notes => self.notes.clone(),
            RequestField::Instructions => self.instructions.clone(),
            RequestField::StatusColor => self.status_color.clone(),
        };
        Some(value)
    }

    /// Aplica un cambio de campo. Si el valor no es válido el borrador no cambia.
    pub fn apply(&mut self, field: RequestField, value: &str) -> Result<(), ClientError> {
        match field {
            RequestField::Subject => self.subject = value.to_string(),
            RequestField::Stage => self.stage = value.parse()?,
            RequestField::TargetType => {
                let target_type: TargetType = value.parse()?;
                if target_type != self.target.target_type() {
                    self.target = MaintenanceTarget::empty(target_type);
                }
            }
            RequestField::EquipmentId => match &mut self.target {
                MaintenanceTarget::Equipment { equipment_id } => *equipment_id = value.to_string(),
                MaintenanceTarget::WorkCenter { .. } => return Err(ClientError::InactiveField(field)),
            },
            RequestField::WorkCenterId => match &mut self.target {
                MaintenanceTarget::WorkCenter { work_center_id } => *work_center_id = value.to_string(),
                MaintenanceTarget::Equipment { .. } => return Err(ClientError::InactiveField(field)),
            },
            RequestField::Category => self.category = value.to_string(),
            RequestField::MaintenanceType => self.maintenance_type = value.parse()?,
            RequestField::Team => self.team = value.to_string(),
            RequestField::Technician => self.technician = value.to_string(),
            RequestField::ScheduledDate => self.scheduled_date = value.to_string(),
            RequestField::Duration => self.duration = value.to_string(),
            RequestField::Priority => self.priority = value.parse()?,
            RequestField::Company => self.company = value.to_string(),
            RequestField::Notes => self.notes = value.to_string(),
            RequestField::Instructions => self.instructions = value.to_string(),
            RequestField::StatusColor => self.status_color = value.to_string(),
        }
        Ok(())
    }

    /// Título del modal: el asunto o "New Request" si aún está vacío
    pub fn title(&self) -> &str {
        if self.subject.trim().is_empty() {
            "New Request"
        } else {
            &self.subject
        }
    }
}
