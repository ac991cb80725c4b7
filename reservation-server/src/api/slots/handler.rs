//! Table Slot API Handlers

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use shared::models::TableSlot;
use shared::request::AvailabilityQuery;
use shared::response::AvailabilityResponse;

use crate::core::{Result, ServerState};

/// GET /mesas - 获取所有桌台时段
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<TableSlot>>> {
    let slots = state.ledger.list_slots()?;
    Ok(Json(slots))
}

/// GET /mesas_disponiveis - 查询指定日期和时段的可用桌数
pub async fn availability(
    State(state): State<ServerState>,
    query: std::result::Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Json<AvailabilityResponse>> {
    let Query(query) = query?;
    let mesas_disponiveis = state
        .ledger
        .get_availability(query.data.as_deref(), query.horario.as_deref())?;
    Ok(Json(AvailabilityResponse { mesas_disponiveis }))
}
