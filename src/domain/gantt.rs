// ==========================================
// 工序计划甘特图 - 甘特图视图模型
// ==========================================
// 资源分组 / 预约条 / 数据集
// 由 GanttBuilder 生成，交给排程控件渲染
// ==========================================

use crate::domain::operation_plan::OperationPlan;
use crate::domain::types::InventoryStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// GanttResource - 资源分组
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GanttResource {
    pub id: u32,
    pub text: String,
    pub color: String,
}

// ==========================================
// Appointment - 预约条（一条工序计划）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub text: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub resource_id: u32,
    pub resource: String,
    pub item: Option<String>,
    pub quantity: Option<f64>,
    pub delay: Option<i64>,
    pub status: Option<String>,
    pub reference: String,

    // 库存状态分类结果
    pub inventory_status: InventoryStatus,

    // 展示状态
    pub fill_color: String,
    pub highlighted: bool,
    pub border: bool,

    // 规范化后的原始记录（详情面板使用）
    pub plan: OperationPlan,
}

impl Appointment {
    /// 提示框内容（逐行）
    pub fn tooltip_lines(&self) -> Vec<(&'static str, String)> {
        fn opt<T: ToString>(v: &Option<T>) -> String {
            v.as_ref().map(|x| x.to_string()).unwrap_or_default()
        }

        vec![
            ("Name", self.text.clone()),
            ("Start Date", self.start.format("%Y-%m-%d %H:%M:%S").to_string()),
            ("End Date", self.end.format("%Y-%m-%d %H:%M:%S").to_string()),
            ("Resource", self.resource.clone()),
            ("Item", opt(&self.item)),
            ("Quantity", opt(&self.quantity)),
            ("Delay", opt(&self.delay)),
            ("Status", opt(&self.status)),
            ("Reference", self.reference.clone()),
        ]
    }

    /// 持续时间（分钟）
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

// ==========================================
// GanttDataset - 甘特图数据集
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttDataset {
    pub resources: Vec<GanttResource>,
    pub appointments: Vec<Appointment>,
    pub current_date: NaiveDateTime, // 初始定位日期
    pub total_records: usize,        // 数据源返回的总记录数
    pub skipped_rows: usize,         // 规范化失败被跳过的行数
}

impl GanttDataset {
    pub fn resource_by_id(&self, id: u32) -> Option<&GanttResource> {
        self.resources.iter().find(|r| r.id == id)
    }

    pub fn resource_id_of(&self, text: &str) -> Option<u32> {
        self.resources.iter().find(|r| r.text == text).map(|r| r.id)
    }

    /// 某资源下的预约条
    pub fn appointments_on(&self, resource_id: u32) -> impl Iterator<Item = &Appointment> {
        self.appointments
            .iter()
            .filter(move |a| a.resource_id == resource_id)
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }
}
