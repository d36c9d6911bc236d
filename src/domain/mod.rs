// ==========================================
// 工序计划甘特图 - 领域模型层
// ==========================================
// 职责: 定义工序计划、甘特图视图模型、领域类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod gantt;
pub mod operation_plan;
pub mod types;

// 重导出核心类型
pub use gantt::{Appointment, GanttDataset, GanttResource};
pub use operation_plan::{DemandRef, OperationPlan, StatusFields, DEFAULT_PLAN_TYPE};
pub use types::{InventoryStatus, ResponseFormat, SchedulerView, StatusColor};
