// ==========================================
// 工序计划甘特图 - 甘特图视图配置
// ==========================================
// 排程控件参数 + 预约条颜色 + 数据源页大小
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::{ResponseFormat, SchedulerView};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GanttViewConfig {
    pub time_zone: String,
    pub views: Vec<SchedulerView>,
    pub current_view: SchedulerView,
    pub first_day_of_week: u32,
    pub start_day_hour: u32,
    pub end_day_hour: u32,
    pub cell_duration: u32, // 分钟
    pub resource_color: String,
    pub highlight_color: String,
    pub appointment_color: String,
    pub view_cutoff: NaiveDate, // 初始定位日期只考虑该日期之后开始的预约
    pub page_size: usize,
    pub height_percent: u32, // 控件高度占屏幕百分比
}

impl Default for GanttViewConfig {
    fn default() -> Self {
        Self {
            time_zone: "America/Los_Angeles".to_string(),
            views: SchedulerView::all(),
            current_view: SchedulerView::TimelineMonth,
            first_day_of_week: 0,
            start_day_hour: 8,
            end_day_hour: 20,
            cell_duration: 60,
            resource_color: "#081a45".to_string(),
            highlight_color: "#081a45".to_string(),
            appointment_color: "rgb(0, 255, 0)".to_string(),
            view_cutoff: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap_or_default(),
            page_size: 1000,
            height_percent: 40,
        }
    }
}

impl GanttViewConfig {
    /// 校验配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.start_day_hour > 24 || self.end_day_hour > 24 {
            return Err(ConfigError::invalid(
                "end_day_hour",
                self.end_day_hour.to_string(),
                "小时数必须在 [0, 24] 范围内",
            ));
        }
        if self.start_day_hour >= self.end_day_hour {
            return Err(ConfigError::invalid(
                "start_day_hour",
                self.start_day_hour.to_string(),
                "开始小时必须小于结束小时",
            ));
        }
        if self.cell_duration == 0 {
            return Err(ConfigError::invalid("cell_duration", "0", "单元格时长必须大于 0"));
        }
        if self.page_size == 0 {
            return Err(ConfigError::invalid("page_size", "0", "页大小必须大于 0"));
        }
        if self.height_percent == 0 || self.height_percent > 100 {
            return Err(ConfigError::invalid(
                "height_percent",
                self.height_percent.to_string(),
                "高度百分比必须在 (0, 100] 范围内",
            ));
        }
        if self.first_day_of_week > 6 {
            return Err(ConfigError::invalid(
                "first_day_of_week",
                self.first_day_of_week.to_string(),
                "必须在 [0, 6] 范围内",
            ));
        }
        if self.views.is_empty() || !self.views.contains(&self.current_view) {
            return Err(ConfigError::invalid(
                "current_view",
                self.current_view.to_string(),
                "当前视图必须在可选视图列表中",
            ));
        }
        Ok(())
    }

    /// 甘特图数据源请求格式
    pub fn gantt_format(&self) -> ResponseFormat {
        ResponseFormat::Gantt {
            page_size: self.page_size,
        }
    }

    /// 控件高度（像素）
    pub fn scheduler_height(&self, screen_height: f64) -> f64 {
        screen_height * self.height_percent as f64 / 100.0
    }
}
