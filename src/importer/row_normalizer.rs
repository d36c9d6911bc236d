// ==========================================
// 工序计划甘特图 - 行记录规范化
// ==========================================
// 职责: 外部行记录 → OperationPlan
// 规则:
// - 同一字段存在 operationplan__ 前缀与无前缀两种写法，前缀字段优先
// - 延迟: delay 优先，无法解析时回退 operationplan__delay
// - 关键度: 两个字段都保留，由分类器判定哨兵值
// - 标记字段按前端真值规则判定（0/""/null/false 为假）
// ==========================================

use crate::domain::operation_plan::{DemandRef, OperationPlan, StatusFields, DEFAULT_PLAN_TYPE};
use crate::engine::inventory_status::parse_js_int;
use crate::importer::error::{ImportError, ImportResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use tracing::{instrument, warn};

/// 外部行记录
pub type RawRow = Map<String, Value>;

/// 字段前缀
const PLAN_PREFIX: &str = "operationplan__";

/// null 颜色代码的文本形式（非数值）
const NULL_COLOR_CODE: &str = "null";

/// 支持的日期时间格式（无时区）
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

// ==========================================
// RowNormalizer - 行记录规范化器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RowNormalizer;

impl RowNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// 规范化单行
    ///
    /// # 返回
    /// - Ok(OperationPlan): 规范化成功
    /// - Err(MissingField): reference / resource / 起止时间缺失
    /// - Err(DateFormatError): 时间无法解析
    pub fn normalize(&self, row: &RawRow) -> ImportResult<OperationPlan> {
        let reference = required_text(row, "reference")?;
        let resource = text(row.get("resource")).ok_or_else(|| ImportError::MissingField {
            field: "resource".to_string(),
        })?;

        let start = required_datetime(row, "startdate")?;
        let end = required_datetime(row, "enddate")?;

        let plan_type = plan_text(row, "type").unwrap_or_else(|| DEFAULT_PLAN_TYPE.to_string());
        let operation = plan_text(row, "operation__name")
            .or_else(|| plan_text(row, "operation"))
            .unwrap_or_default();
        let item = plan_text(row, "item__name").or_else(|| plan_text(row, "item"));

        Ok(OperationPlan {
            reference,
            plan_type,
            operation,
            resource,
            item,
            start,
            end,
            quantity: plan_field(row, "quantity").and_then(number),
            quantity_completed: plan_field(row, "quantity_completed").and_then(number),
            status: plan_text(row, "status"),
            origin: plan_text(row, "origin"),
            demands: plan_field(row, "demands").map(demands).unwrap_or_default(),
            status_fields: self.status_fields(row),
        })
    }

    /// 批量规范化，失败行记录告警后跳过
    ///
    /// # 返回
    /// - (规范化成功的记录, 跳过行数)
    #[instrument(skip(self, rows), fields(count = rows.len()))]
    pub fn normalize_all(&self, rows: &[RawRow]) -> (Vec<OperationPlan>, usize) {
        let mut plans = Vec::with_capacity(rows.len());
        let mut skipped = 0;

        for (idx, row) in rows.iter().enumerate() {
            match self.normalize(row) {
                Ok(plan) => plans.push(plan),
                Err(e) => {
                    warn!(row = idx, error = %e, "跳过无法规范化的行");
                    skipped += 1;
                }
            }
        }

        (plans, skipped)
    }

    /// 提取分类器输入字段
    pub fn status_fields(&self, row: &RawRow) -> StatusFields {
        let delay = row
            .get("delay")
            .and_then(int)
            .or_else(|| row.get("operationplan__delay").and_then(int));

        StatusFields {
            color: row.get("color").map(color_code),
            inventory_item: row.get("inventory_item").map(truthy).unwrap_or(false),
            leadtime: row.get("leadtime").map(truthy).unwrap_or(false),
            computed_color: row.get("computed_color").and_then(number),
            delay,
            criticality: row.get("criticality").and_then(int),
            plan_criticality: row.get("operationplan__criticality").and_then(int),
        }
    }
}

// ==========================================
// 字段读取
// ==========================================

/// 读取字段，前缀写法优先
fn plan_field<'a>(row: &'a RawRow, name: &str) -> Option<&'a Value> {
    row.get(&format!("{}{}", PLAN_PREFIX, name))
        .filter(|v| !v.is_null())
        .or_else(|| row.get(name).filter(|v| !v.is_null()))
}

fn plan_text(row: &RawRow, name: &str) -> Option<String> {
    plan_field(row, name).and_then(|v| text(Some(v)))
}

fn required_text(row: &RawRow, name: &str) -> ImportResult<String> {
    plan_text(row, name).ok_or_else(|| ImportError::MissingField {
        field: name.to_string(),
    })
}

fn required_datetime(row: &RawRow, name: &str) -> ImportResult<NaiveDateTime> {
    let value = required_text(row, name)?;
    parse_datetime(&value).ok_or_else(|| ImportError::DateFormatError {
        field: name.to_string(),
        value,
    })
}

/// 文本值（去空白，空串视为缺失）
fn text(value: Option<&Value>) -> Option<String> {
    text_raw(value?)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// 文本值（原样，仅 null 视为缺失）
fn text_raw(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// 颜色代码（null 与缺失区分: null 保留为非数值代码，仍进入延迟分支）
fn color_code(value: &Value) -> String {
    text_raw(value).unwrap_or_else(|| NULL_COLOR_CODE.to_string())
}

/// 浮点值（数字或数字字符串）
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// 整数值（parseInt 语义: 数字截断，字符串取数字前缀）
fn int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_js_int(s),
        _ => None,
    }
}

/// 真值判定
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// 需求列表: [[数量, 名称, ...], ...]，也接受 JSON 字符串形式
fn demands(value: &Value) -> Vec<DemandRef> {
    let parsed;
    let list = match value {
        Value::Array(list) => list,
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(list)) => {
                parsed = list;
                &parsed
            }
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    list.iter()
        .filter_map(|entry| match entry {
            Value::Array(parts) => {
                let name = parts.get(1).and_then(|v| text(Some(v)))?;
                Some(DemandRef {
                    quantity: parts.first().and_then(number),
                    name,
                })
            }
            Value::Object(obj) => {
                let name = text(obj.get("name"))?;
                Some(DemandRef {
                    quantity: obj.get("quantity").and_then(number),
                    name,
                })
            }
            _ => None,
        })
        .collect()
}

/// 解析日期时间
///
/// 带时区的时间（RFC 3339）取其本地时间部分；纯日期取零点
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
