// ============================================================================
// NAVIGATION - SHELL DE NAVEGACIÓN
// ============================================================================
// Página seleccionada como estado explícito. Cambiar de página es síncrono,
// idempotente y nunca toca la red.
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utils::errors::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    Dashboard,
    Kanban,
    Calendar,
    Equipment,
    Teams,
    WorkCenters,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Dashboard,
        Page::Kanban,
        Page::Calendar,
        Page::Equipment,
        Page::Teams,
        Page::WorkCenters,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Kanban => "kanban",
            Page::Calendar => "calendar",
            Page::Equipment => "equipment",
            Page::Teams => "teams",
            Page::WorkCenters => "work_centers",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Kanban => "KanBan",
            Page::Calendar => "Calendar",
            Page::Equipment => "Equipment",
            Page::Teams => "Teams",
            Page::WorkCenters => "Work Centers",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Page {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .into_iter()
            .find(|page| page.id() == s)
            .ok_or_else(|| ClientError::Validation(format!("unknown page '{}'", s)))
    }
}

/// Enlace del menú
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub page: Page,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub current: Page,
}

impl NavigationState {
    /// Selecciona una página por id; un id desconocido no cambia nada
    pub fn select_page(&mut self, id: &str) -> Result<Page, ClientError> {
        let page = id.parse::<Page>()?;
        if page != self.current {
            log::debug!("🧭 Página: {} -> {}", self.current, page);
        }
        self.current = page;
        Ok(page)
    }

    pub fn links(&self) -> Vec<NavLink> {
        Page::ALL
            .into_iter()
            .map(|page| NavLink {
                page,
                label: page.label(),
                active: page == self.current,
            })
            .collect()
    }
}
