//! Reservation Server - 餐厅桌台预约服务
//!
//! # 架构概述
//!
//! - **账本** (`ledger`): 桌台时段与预约记录，redb 存储
//! - **HTTP API** (`api`): `/mesas`、`/mesas_disponiveis`、`/reservas`
//! - **核心** (`core`): 配置、状态、错误、服务器
//!
//! # 模块结构
//!
//! ```text
//! reservation-server/src/
//! ├── core/          # 配置、状态、错误
//! ├── ledger/        # 预约账本 (业务规则 + 存储)
//! ├── api/           # HTTP 路由和处理器
//! ├── middleware/    # 请求日志
//! └── utils/         # 日志初始化
//! ```

pub mod api;
pub mod core;
pub mod ledger;
pub mod middleware;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerError, ServerState};
pub use ledger::{LedgerError, ReservationLedger};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// 加载 .env 并初始化日志
pub fn setup_environment() -> Config {
    let _ = dotenv::dotenv();
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    config
}
