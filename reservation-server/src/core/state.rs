use anyhow::Context;

use crate::core::Config;
use crate::ledger::{LedgerStorage, ReservationLedger};

/// 服务器状态 - 持有配置和预约账本
///
/// 使用 Clone 浅拷贝 (账本内部为 `Arc<Database>`)，传给 axum 作为共享状态。
/// 数据库在最后一个副本被 drop 时关闭。
///
/// # 使用示例
///
/// ```ignore
/// let state = ServerState::initialize(&config)?;
/// let slots = state.ledger.list_slots()?;
/// ```
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 预约账本
    pub ledger: ReservationLedger,
}

impl ServerState {
    pub fn new(config: Config, ledger: ReservationLedger) -> Self {
        Self { config, ledger }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 校验配置
    /// 2. 工作目录结构
    /// 3. 数据库 (work_dir/database/reservations.redb)
    /// 4. 初始化桌台 (已存在的时段保持不变)
    pub fn initialize(config: &Config) -> anyhow::Result<Self> {
        config.validate().context("Invalid configuration")?;

        config
            .ensure_work_dir_structure()
            .context("Failed to create work directory structure")?;

        let db_path = config.database_path();
        let storage = LedgerStorage::open(&db_path).map_err(|e| {
            anyhow::anyhow!("Failed to open database at {}: {}", db_path.display(), e)
        })?;
        tracing::info!(path = %db_path.display(), "Database opened");

        let ledger = ReservationLedger::new(storage);
        ledger
            .seed_slots(&config.seed_dates, &config.seed_times, config.seed_capacity)
            .map_err(|e| anyhow::anyhow!("Failed to seed table slots: {}", e))?;

        Ok(Self::new(config.clone(), ledger))
    }
}
