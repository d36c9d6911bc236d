// ==========================================
// 工序计划甘特图 - 工序计划领域模型
// ==========================================
// 外部行记录（带/不带 operationplan__ 前缀）在导入边界
// 统一映射为 OperationPlan，下游只依赖本结构
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 未指定类型时的默认工序计划类型（制造订单）
pub const DEFAULT_PLAN_TYPE: &str = "MO";

// ==========================================
// StatusFields - 库存状态分类输入
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusFields {
    pub color: Option<String>,      // 颜色代码（字符串形式，可能为空）
    pub inventory_item: bool,       // 库存物料标记
    pub leadtime: bool,             // 提前期标记
    pub computed_color: Option<f64>, // 覆盖率百分比（仅展示）
    pub delay: Option<i64>,         // 延迟原始值（已按 delay → operationplan__delay 回退）
    pub criticality: Option<i64>,   // 关键度
    pub plan_criticality: Option<i64>, // operationplan__criticality
}

impl StatusFields {
    /// 是否走覆盖率分支
    pub fn uses_coverage(&self) -> bool {
        self.inventory_item || self.leadtime
    }

    /// 任一关键度字段为 999 即视为"不适用"
    pub fn criticality_not_applicable(&self) -> bool {
        self.criticality == Some(999) || self.plan_criticality == Some(999)
    }
}

// ==========================================
// DemandRef - 需求引用
// ==========================================
// 外部格式为 [数量, 需求名, ...]，需求身份以名称区分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandRef {
    pub quantity: Option<f64>,
    pub name: String,
}

// ==========================================
// OperationPlan - 工序计划（规范化记录）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationPlan {
    // ===== 标识 =====
    pub reference: String,
    pub plan_type: String,

    // ===== 工序/资源/物料 =====
    pub operation: String,
    pub resource: String,
    pub item: Option<String>,

    // ===== 时间 =====
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,

    // ===== 数量/状态 =====
    pub quantity: Option<f64>,
    pub quantity_completed: Option<f64>,
    pub status: Option<String>,
    pub origin: Option<String>,

    // ===== 需求 =====
    pub demands: Vec<DemandRef>,

    // ===== 分类输入 =====
    pub status_fields: StatusFields,
}

impl OperationPlan {
    /// 需求名称集合
    pub fn demand_names(&self) -> impl Iterator<Item = &str> {
        self.demands.iter().map(|d| d.name.as_str())
    }

    /// 是否与另一工序计划共享至少一个需求
    pub fn shares_demand_with(&self, other: &OperationPlan) -> bool {
        self.demand_names()
            .any(|name| other.demand_names().any(|o| o == name))
    }

    /// 延迟原始值（秒），用于提示框展示
    pub fn delay(&self) -> Option<i64> {
        self.status_fields.delay
    }
}
