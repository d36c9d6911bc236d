// ==========================================
// 工序计划甘特图 - 配置层
// ==========================================
// 职责: 甘特图视图配置管理,支持数据库覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod error;
pub mod gantt_view_config;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use gantt_view_config::GanttViewConfig;
