use std::path::PathBuf;

use shared::slot;

const DEFAULT_SEED_DATES: &str = "27/07/2023,28/07/2023";
const DEFAULT_SEED_TIMES: &str = "11:00,12:00,13:00,14:00,18:00,19:00,20:00";
const DEFAULT_SEED_CAPACITY: u32 = 10;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库位于 database/) |
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | SEED_DATES | 27/07/2023,28/07/2023 | 初始化桌台的日期 (逗号分隔) |
/// | SEED_TIMES | 11:00,...,20:00 | 初始化桌台的时段 (逗号分隔) |
/// | SEED_CAPACITY | 10 | 每个时段的初始可用桌数 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 日志文件目录 (可选) |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 SEED_DATES=01/08/2023,02/08/2023 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 初始化日期 (DD/MM/YYYY)
    pub seed_dates: Vec<String>,
    /// 初始化时段 (HH:MM)
    pub seed_times: Vec<String>,
    /// 每个时段的初始可用桌数
    pub seed_capacity: u32,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            seed_dates: parse_list(
                &std::env::var("SEED_DATES").unwrap_or_else(|_| DEFAULT_SEED_DATES.into()),
            ),
            seed_times: parse_list(
                &std::env::var("SEED_TIMES").unwrap_or_else(|_| DEFAULT_SEED_TIMES.into()),
            ),
            seed_capacity: std::env::var("SEED_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SEED_CAPACITY),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
        }
    }

    /// 检查初始化数据格式
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.seed_dates.is_empty() || self.seed_times.is_empty() {
            anyhow::bail!("SEED_DATES and SEED_TIMES must each list at least one value");
        }
        for date in &self.seed_dates {
            slot::parse_date(date)?;
        }
        for time in &self.seed_times {
            slot::parse_time(time)?;
        }
        Ok(())
    }

    /// 数据库目录: work_dir/database
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 数据库文件路径
    pub fn database_path(&self) -> PathBuf {
        self.database_dir().join("reservations.redb")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
