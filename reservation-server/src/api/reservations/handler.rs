//! Reservation API Handlers

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use shared::models::Reservation;
use shared::request::ReservationCreate;
use shared::response::MessageResponse;

use crate::core::{Result, ServerError, ServerState};

/// GET /reservas - 获取所有预约
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Reservation>>> {
    let reservations = state.ledger.list_reservations()?;
    Ok(Json(reservations))
}

/// POST /reservas - 创建预约
pub async fn create(
    State(state): State<ServerState>,
    payload: std::result::Result<Json<ReservationCreate>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(payload) = payload?;
    state.ledger.create_reservation(&payload)?;
    Ok(Json(MessageResponse::new("Reservation created successfully.")))
}

/// DELETE /reservas/{id} - 取消预约
///
/// 非整数 ID 不匹配任何预约, 返回 404
pub async fn cancel(
    State(state): State<ServerState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>> {
    let Path(id) = id.map_err(|e| {
        tracing::debug!(error = %e.body_text(), "Unparseable reservation id");
        ServerError::NotFound("reservation not found".to_string())
    })?;
    state.ledger.cancel_reservation(id)?;
    Ok(Json(MessageResponse::new("Reservation cancelled successfully.")))
}
