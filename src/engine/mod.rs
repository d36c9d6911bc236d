// ==========================================
// 工序计划甘特图 - 引擎层
// ==========================================
// 职责: 库存状态分类、甘特图数据构建、交互状态
// 红线: Engine 不拼 SQL, 不做文件 I/O
// ==========================================

pub mod error;
pub mod gantt_board;
pub mod gantt_builder;
pub mod inventory_status;

// 重导出核心引擎
pub use error::{BoardError, BoardResult};
pub use gantt_board::{GanttBoard, Selection};
pub use gantt_builder::GanttBuilder;
pub use inventory_status::{delay_days, parse_js_int, InventoryStatusClassifier, StatusLabels};
