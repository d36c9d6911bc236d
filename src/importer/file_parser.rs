// ==========================================
// 工序计划甘特图 - 文件解析器实现
// ==========================================
// 支持: JSON (数据源响应/行数组) / CSV / Excel (.xlsx/.xls)
// 输出: PlanningResponse（行记录 + 总记录数）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::row_normalizer::RawRow;
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::path::Path;

// ==========================================
// PlanningResponse - 数据源响应
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanningResponse {
    pub rows: Vec<RawRow>,
    #[serde(default)]
    pub records: Option<usize>,
}

impl PlanningResponse {
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self {
            rows,
            records: None,
        }
    }

    /// 总记录数（未提供时取行数）
    pub fn total_records(&self) -> usize {
        self.records.unwrap_or(self.rows.len())
    }

    /// 按页大小截断
    pub fn truncate(&mut self, page_size: usize) {
        if self.records.is_none() {
            self.records = Some(self.rows.len());
        }
        self.rows.truncate(page_size);
    }
}

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser: Send + Sync {
    /// 解析文件为数据源响应
    fn parse(&self, file_path: &Path) -> ImportResult<PlanningResponse>;
}

/// 检查文件存在
fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

// ==========================================
// JSON Parser 实现
// ==========================================
pub struct JsonParser;

impl JsonParser {
    /// 解析 JSON 文本
    ///
    /// 接受两种结构:
    /// - {"rows": [...], "records": N}
    /// - [...]（行数组）
    pub fn parse_str(&self, content: &str) -> ImportResult<PlanningResponse> {
        let value: Value = serde_json::from_str(content)?;
        match value {
            Value::Object(_) => {
                let response: PlanningResponse = serde_json::from_value(value)?;
                Ok(response)
            }
            Value::Array(items) => {
                let rows = items
                    .into_iter()
                    .map(|item| match item {
                        Value::Object(map) => Ok(map),
                        other => Err(ImportError::InvalidResponse(format!(
                            "行记录必须为对象: {}",
                            other
                        ))),
                    })
                    .collect::<ImportResult<Vec<_>>>()?;
                Ok(PlanningResponse::new(rows))
            }
            other => Err(ImportError::InvalidResponse(format!(
                "期望对象或数组，实际: {}",
                other
            ))),
        }
    }
}

impl FileParser for JsonParser {
    fn parse(&self, file_path: &Path) -> ImportResult<PlanningResponse> {
        ensure_exists(file_path)?;
        let content = std::fs::read_to_string(file_path)?;
        self.parse_str(&content)
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse(&self, file_path: &Path) -> ImportResult<PlanningResponse> {
        ensure_exists(file_path)?;

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        // 读取所有行
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let cells: Vec<&str> = record.iter().collect();
            if let Some(row) = build_row(&headers, &cells) {
                rows.push(row);
            }
        }

        Ok(PlanningResponse::new(rows))
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse(&self, file_path: &Path) -> ImportResult<PlanningResponse> {
        ensure_exists(file_path)?;

        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut sheet_rows = range.rows();
        let header_row = sheet_rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        // 读取数据行
        let mut rows = Vec::new();
        for data_row in sheet_rows {
            let cells: Vec<String> = data_row.iter().map(|c| c.to_string()).collect();
            let cells: Vec<&str> = cells.iter().map(|s| s.as_str()).collect();
            if let Some(row) = build_row(&headers, &cells) {
                rows.push(row);
            }
        }

        Ok(PlanningResponse::new(rows))
    }
}

// ==========================================
// Universal Parser - 按扩展名分发
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse(&self, file_path: &Path) -> ImportResult<PlanningResponse> {
        match extension_of(file_path).as_str() {
            "json" => JsonParser.parse(file_path),
            "csv" => CsvParser.parse(file_path),
            "xlsx" | "xls" => ExcelParser.parse(file_path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

// ==========================================
// 表格单元格 → JSON 值
// ==========================================

/// 由表头与单元格构建行记录；空白单元格视为字段缺失，完全空白的行返回 None
fn build_row(headers: &[String], cells: &[&str]) -> Option<RawRow> {
    let mut row = RawRow::new();
    for (idx, cell) in cells.iter().enumerate() {
        if let Some(header) = headers.get(idx).filter(|h| !h.is_empty()) {
            let value = infer_cell_value(cell);
            if !value.is_null() {
                row.insert(header.clone(), value);
            }
        }
    }

    if row.is_empty() {
        return None;
    }
    Some(row)
}

/// 单元格类型推断
///
/// - 空白 → null
/// - true/false → 布尔
/// - 整数/浮点 → 数字
/// - 以 [ 开头的合法 JSON → 数组（需求列表）
/// - 其他 → 字符串
pub fn infer_cell_value(cell: &str) -> Value {
    let cell = cell.trim();
    if cell.is_empty() {
        return Value::Null;
    }
    if cell.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if cell.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = cell.parse::<f64>() {
        if f.is_finite() {
            return Value::from(f);
        }
    }
    if cell.starts_with('[') {
        if let Ok(v @ Value::Array(_)) = serde_json::from_str::<Value>(cell) {
            return v;
        }
    }
    Value::String(cell.to_string())
}
