use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::RequestController;
use crate::dto::request_dto::{FieldUpdateRequest, SaveRequestPayload, WriteAck};
use crate::middleware::AuthenticatedUser;
use crate::models::{DashboardData, RequestRecord};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas `/api/*`; el middleware de sesión se aplica al anidarlas
pub fn create_request_router() -> Router<AppState> {
    Router::new()
        .route("/equipment-data", get(equipment_data))
        .route("/request/update", post(update_field))
        .route("/request/save", post(save_request))
        .route("/request/delete/:id", post(delete_request))
        .route("/request/:id", get(get_request))
}

async fn equipment_data(State(state): State<AppState>) -> Json<DashboardData> {
    let controller = RequestController::new(state.repository.clone());
    Json(controller.dashboard(chrono::Utc::now()).await)
}

async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RequestRecord>, AppError> {
    let controller = RequestController::new(state.repository.clone());
    Ok(Json(controller.get(&id).await?))
}

async fn update_field(
    State(state): State<AppState>,
    Json(request): Json<FieldUpdateRequest>,
) -> Result<Json<WriteAck>, AppError> {
    let controller = RequestController::new(state.repository.clone());
    Ok(Json(controller.update_field(request).await?))
}

async fn save_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<SaveRequestPayload>,
) -> Result<Json<WriteAck>, AppError> {
    let controller = RequestController::new(state.repository.clone());
    Ok(Json(controller.save(payload, &user.name).await?))
}

async fn delete_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WriteAck>, AppError> {
    let controller = RequestController::new(state.repository.clone());
    Ok(Json(controller.delete(&id).await?))
}
