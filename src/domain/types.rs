// ==========================================
// 工序计划甘特图 - 领域类型定义
// ==========================================
// 状态颜色 / 库存状态 / 数据源响应格式 / 排程视图
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 状态颜色 (Status Color)
// ==========================================
// 输出格式与排程控件的 CSS 颜色一致（半透明）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusColor {
    OnTime,                 // 绿色: 提前/准时/覆盖充足
    Short,                  // 红色: 缺料/严重延迟
    Gradient { green: i64 }, // 红→黄渐变
}

impl StatusColor {
    /// 按百分比代码计算渐变色
    ///
    /// green = round(code / 100 * 255)，不做截断
    pub fn gradient(code: i64) -> Self {
        StatusColor::Gradient {
            green: js_round(code as f64 / 100.0 * 255.0) as i64,
        }
    }
}

impl fmt::Display for StatusColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusColor::OnTime => write!(f, "rgba(0,128,0,0.5)"),
            StatusColor::Short => write!(f, "rgba(255,0,0,0.5)"),
            StatusColor::Gradient { green } => write!(f, "rgba(255,{},0,0.5)", green),
        }
    }
}

// ==========================================
// 库存状态 (Inventory Status)
// ==========================================
// 分类器输出: (颜色, 标签)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InventoryStatus {
    pub color: Option<StatusColor>,
    pub label: String,
}

impl InventoryStatus {
    /// 无分类结果 (none, "")
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(color: StatusColor, label: impl Into<String>) -> Self {
        Self {
            color: Some(color),
            label: label.into(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.color.is_none() && self.label.is_empty()
    }

    /// CSS 颜色字符串
    pub fn color_css(&self) -> Option<String> {
        self.color.map(|c| c.to_string())
    }

    /// 转换为 (颜色, 标签) 二元组
    pub fn into_pair(self) -> (Option<String>, String) {
        (self.color.map(|c| c.to_string()), self.label)
    }
}

// ==========================================
// 数据源响应格式 (Response Format)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    Json,
    Gantt { page_size: usize },
}

impl ResponseFormat {
    /// 查询参数
    pub fn query_string(&self) -> String {
        match self {
            ResponseFormat::Json => "format=json".to_string(),
            ResponseFormat::Gantt { page_size } => format!("format=gantt&pagesize={}", page_size),
        }
    }

    /// 拼接到 URL（去掉片段标识 `#...`，已有查询串时使用 `&`）
    pub fn append_to(&self, url: &str) -> String {
        let base = url.split('#').next().unwrap_or(url);
        let sep = if base.contains('?') { '&' } else { '?' };
        format!("{}{}{}", base, sep, self.query_string())
    }

    /// 页大小上限（Json 格式不限）
    pub fn page_size(&self) -> Option<usize> {
        match self {
            ResponseFormat::Json => None,
            ResponseFormat::Gantt { page_size } => Some(*page_size),
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.query_string())
    }
}

// ==========================================
// 排程视图 (Scheduler View)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerView {
    #[serde(rename = "timelineDay")]
    TimelineDay,
    #[serde(rename = "timelineWeek")]
    TimelineWeek,
    #[serde(rename = "timelineWorkWeek")]
    TimelineWorkWeek,
    #[serde(rename = "timelineMonth")]
    TimelineMonth,
}

impl SchedulerView {
    pub fn all() -> Vec<SchedulerView> {
        vec![
            SchedulerView::TimelineDay,
            SchedulerView::TimelineWeek,
            SchedulerView::TimelineWorkWeek,
            SchedulerView::TimelineMonth,
        ]
    }

    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim() {
            "timelineDay" => Some(SchedulerView::TimelineDay),
            "timelineWeek" => Some(SchedulerView::TimelineWeek),
            "timelineWorkWeek" => Some(SchedulerView::TimelineWorkWeek),
            "timelineMonth" => Some(SchedulerView::TimelineMonth),
            _ => None,
        }
    }
}

impl fmt::Display for SchedulerView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerView::TimelineDay => write!(f, "timelineDay"),
            SchedulerView::TimelineWeek => write!(f, "timelineWeek"),
            SchedulerView::TimelineWorkWeek => write!(f, "timelineWorkWeek"),
            SchedulerView::TimelineMonth => write!(f, "timelineMonth"),
        }
    }
}

// ==========================================
// 数值工具 (与前端展示保持一致)
// ==========================================

/// 四舍五入（.5 向正无穷方向进位）
pub fn js_round(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// 数值转展示字符串: 整数不带小数点，-0 显示为 0
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}
