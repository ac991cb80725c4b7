//! 健康检查路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /health | GET | 健康检查 |
//!
//! # 响应示例
//!
//! ```json
//! {
//!   "status": "ok",
//!   "version": "0.1.0",
//!   "slots": 14,
//!   "reservations": 3
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::{Result, ServerState};

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// 状态 (ok)
    status: &'static str,
    /// 版本号
    version: &'static str,
    /// 时段数量
    slots: u64,
    /// 预约数量
    reservations: u64,
}

/// GET /health
///
/// 读取一次账本统计，数据库不可用时返回 500
async fn health(State(state): State<ServerState>) -> Result<Json<HealthResponse>> {
    let stats = state.ledger.stats()?;
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        slots: stats.slots,
        reservations: stats.reservations,
    }))
}
