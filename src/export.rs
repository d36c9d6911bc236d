// ==========================================
// 工序计划甘特图 - 预约条导出
// ==========================================
// 输出: CSV（表头 + 每个预约条一行）
// 时间格式: %Y-%m-%d %H:%M:%S
// ==========================================

use crate::domain::gantt::{Appointment, GanttDataset};
use crate::domain::types::format_number;
use crate::engine::inventory_status::delay_days;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::info;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 导出错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("文件写入失败: {0}")]
    WriteError(String),

    #[error("CSV 序列化失败: {0}")]
    CsvError(String),
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::WriteError(err.to_string())
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::CsvError(err.to_string())
    }
}

pub type ExportResult<T> = Result<T, ExportError>;

// ==========================================
// ExportRecord - 导出行
// ==========================================
#[derive(Debug, Serialize)]
struct ExportRecord<'a> {
    reference: &'a str,
    resource: &'a str,
    operation: &'a str,
    item: &'a str,
    startdate: String,
    enddate: String,
    quantity: Option<f64>,
    status: &'a str,
    delay_days: String,
    inventory_status: &'a str,
    status_color: String,
}

impl<'a> From<&'a Appointment> for ExportRecord<'a> {
    fn from(a: &'a Appointment) -> Self {
        Self {
            reference: &a.reference,
            resource: &a.resource,
            operation: &a.text,
            item: a.item.as_deref().unwrap_or(""),
            startdate: a.start.format(DATETIME_FORMAT).to_string(),
            enddate: a.end.format(DATETIME_FORMAT).to_string(),
            quantity: a.quantity,
            status: a.status.as_deref().unwrap_or(""),
            delay_days: a
                .delay
                .map(|d| format_number(delay_days(d)))
                .unwrap_or_default(),
            inventory_status: &a.inventory_status.label,
            status_color: a.inventory_status.color_css().unwrap_or_default(),
        }
    }
}

// ==========================================
// AppointmentExporter - 预约条导出器
// ==========================================
pub struct AppointmentExporter;

impl AppointmentExporter {
    /// 写入 CSV
    ///
    /// # 返回
    /// - Ok(usize): 导出行数
    pub fn write_csv<W: Write>(writer: W, dataset: &GanttDataset) -> ExportResult<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for appointment in &dataset.appointments {
            csv_writer.serialize(ExportRecord::from(appointment))?;
        }
        csv_writer.flush()?;
        Ok(dataset.appointments.len())
    }

    /// 导出到文件
    pub fn export_to_path(path: &Path, dataset: &GanttDataset) -> ExportResult<usize> {
        let file = std::fs::File::create(path)?;
        let count = Self::write_csv(file, dataset)?;
        info!(path = %path.display(), count, "预约条导出完成");
        Ok(count)
    }
}
