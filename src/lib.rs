// ==========================================
// 工序计划甘特图 - 核心库
// ==========================================
// 职责: 读取计划数据 → 规范化 → 库存状态分类 → 甘特图数据集
// 技术栈: Rust + SQLite
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 分类与构建
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 导出层 - CSV
pub mod export;

// 配置层 - 视图配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{ConfigManager, GanttViewConfig};
pub use domain::{
    Appointment, GanttDataset, GanttResource, InventoryStatus, OperationPlan, ResponseFormat,
    StatusColor, StatusFields,
};
pub use engine::{GanttBoard, GanttBuilder, InventoryStatusClassifier};
pub use export::AppointmentExporter;
pub use importer::{FilePlanningSource, PlanningSource, RepositoryPlanningSource, RowNormalizer};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "opplan-gantt";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
