//! Table Slot API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /mesas | GET | 所有时段及可用桌数 |
//! | /mesas_disponiveis?data=&horario= | GET | 指定时段的可用桌数 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/mesas", get(handler::list))
        .route("/mesas_disponiveis", get(handler::availability))
}
