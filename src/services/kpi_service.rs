//! Cálculo de KPIs del dashboard
//!
//! - equipos críticos: salud < 30%
//! - carga de técnicos: media entera de `current_load`
//! - solicitudes abiertas: etapa distinta de Done y Scrap
//! - vencidas: abiertas con fecha programada pasada

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::models::{EquipmentEntry, KpiSnapshot, RequestRecord, TechnicianEntry};

pub const CRITICAL_HEALTH_THRESHOLD: u32 = 30;

const SCHEDULE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Interpreta la fecha programada tal como la guarda el formulario
pub fn parse_scheduled_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    SCHEDULE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Una solicitud abierta está vencida si su fecha programada ya pasó
pub fn is_overdue(record: &RequestRecord, now: DateTime<Utc>) -> bool {
    record.stage.is_open()
        && parse_scheduled_date(&record.scheduled_date)
            .map(|scheduled| scheduled < now.naive_utc())
            .unwrap_or(false)
}

/// Calcula el snapshot completo
pub fn compute_kpis<'a, I>(
    equipment: &[EquipmentEntry],
    technicians: &[TechnicianEntry],
    requests: I,
    now: DateTime<Utc>,
) -> KpiSnapshot
where
    I: IntoIterator<Item = &'a RequestRecord>,
{
    let critical_count = equipment
        .iter()
        .filter(|e| e.health < CRITICAL_HEALTH_THRESHOLD)
        .count() as u32;

    let tech_load = if technicians.is_empty() {
        0
    } else {
        let total: u64 = technicians.iter().map(|t| u64::from(t.current_load)).sum();
        (total / technicians.len() as u64) as u32
    };

    let mut open_requests = 0;
    let mut overdue = 0;
    for record in requests {
        if record.stage.is_open() {
            open_requests += 1;
            if is_overdue(record, now) {
                overdue += 1;
            }
        }
    }

    KpiSnapshot {
        critical_count,
        tech_load,
        open_requests,
        overdue,
    }
}
