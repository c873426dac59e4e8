pub mod app_viewmodel;
pub mod auth_form;
pub mod dashboard_viewmodel;
pub mod navigation;

pub use app_viewmodel::{AppView, AppViewModel};
pub use auth_form::{AuthField, AuthFormState, AuthFormViewModel};
pub use dashboard_viewmodel::DashboardViewModel;
pub use navigation::{NavLink, NavigationState, Page};
