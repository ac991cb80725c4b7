//! Reservation API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /reservas | GET | 所有预约 |
//! | /reservas | POST | 创建预约 |
//! | /reservas/{id} | DELETE | 取消预约 |

mod handler;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/reservas", get(handler::list).post(handler::create))
        .route("/reservas/{id}", delete(handler::cancel))
}
