// ==========================================
// 工序计划甘特图 - 库存状态分类引擎
// ==========================================
// 职责: 根据颜色代码/延迟/关键度计算展示颜色与状态标签
// 输入: StatusFields（已在导入边界规范化）
// 输出: InventoryStatus (color, label)
// 红线: 纯函数，不修改输入，不抛错；无法解析的数值一律走默认分支
// ==========================================

use crate::domain::operation_plan::{OperationPlan, StatusFields};
use crate::domain::types::{format_number, js_round, InventoryStatus, StatusColor};
use tracing::instrument;

/// 覆盖率"不跟踪"哨兵值
pub const COLOR_NOT_TRACKED: i64 = 999_999;

/// 延迟换算除数: 原始值 / 8640 → 天（保留 1 位小数）
pub const DELAY_UNITS_PER_DAY: f64 = 8640.0;

// ==========================================
// StatusLabels - 状态标签文案
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLabels {
    pub days_early: String,
    pub on_time: String,
    pub days_late: String,
}

impl StatusLabels {
    /// 按指定语言加载文案
    pub fn for_locale(locale: &str) -> Self {
        Self {
            days_early: crate::i18n::t_for("inventory_status.days_early", locale),
            on_time: crate::i18n::t_for("inventory_status.on_time", locale),
            days_late: crate::i18n::t_for("inventory_status.days_late", locale),
        }
    }

    /// 按当前语言加载文案
    pub fn current() -> Self {
        Self::for_locale(&crate::i18n::current_locale())
    }
}

// ==========================================
// InventoryStatusClassifier - 库存状态分类器
// ==========================================
#[derive(Debug, Clone)]
pub struct InventoryStatusClassifier {
    labels: StatusLabels,
}

impl Default for InventoryStatusClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryStatusClassifier {
    /// 使用当前语言创建分类器
    pub fn new() -> Self {
        Self {
            labels: StatusLabels::current(),
        }
    }

    pub fn for_locale(locale: &str) -> Self {
        Self {
            labels: StatusLabels::for_locale(locale),
        }
    }

    pub fn with_labels(labels: StatusLabels) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &StatusLabels {
        &self.labels
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 分类单条记录
    ///
    /// 规则（顺序执行，命中即返回）:
    /// 1) color 缺失或为空串 → (none, "")
    /// 2) inventory_item || leadtime → 覆盖率分支（color 须为整数）
    /// 3) 否则 → 延迟分支
    /// 4) 其余情况 → (none, "")
    pub fn classify(&self, fields: &StatusFields) -> InventoryStatus {
        let color = match fields.color.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => return InventoryStatus::none(),
        };
        let code = parse_js_int(color);

        if fields.uses_coverage() {
            match code {
                Some(code) => self.classify_coverage(code, fields.computed_color),
                None => InventoryStatus::none(),
            }
        } else {
            self.classify_delay(code, fields)
        }
    }

    /// 分类工序计划
    pub fn classify_plan(&self, plan: &OperationPlan) -> InventoryStatus {
        self.classify(&plan.status_fields)
    }

    /// 批量分类
    #[instrument(skip(self, plans), fields(count = plans.len()))]
    pub fn classify_batch(&self, plans: &[OperationPlan]) -> Vec<InventoryStatus> {
        plans.iter().map(|p| self.classify_plan(p)).collect()
    }

    // ==========================================
    // 覆盖率分支
    // ==========================================

    /// - [100, 999999) → 绿色
    /// - 0 → 红色
    /// - 999999 → 不跟踪
    /// - 其他 → 红→黄渐变
    fn classify_coverage(&self, code: i64, computed_color: Option<f64>) -> InventoryStatus {
        if code == COLOR_NOT_TRACKED {
            return InventoryStatus::none();
        }

        let color = if (100..COLOR_NOT_TRACKED).contains(&code) {
            StatusColor::OnTime
        } else if code == 0 {
            StatusColor::Short
        } else {
            StatusColor::gradient(code)
        };

        InventoryStatus::new(color, coverage_label(computed_color))
    }

    // ==========================================
    // 延迟分支
    // ==========================================

    /// - 关键度 999 → 不适用
    /// - 提前 → 绿色 "N days early"
    /// - 准时 → 绿色 "on time"
    /// - 延迟 → 代码在 [0,100] 内取渐变色，否则红色
    fn classify_delay(&self, code: Option<i64>, fields: &StatusFields) -> InventoryStatus {
        if fields.criticality_not_applicable() {
            return InventoryStatus::none();
        }

        let days = match fields.delay.map(delay_days) {
            Some(d) => d,
            None => return InventoryStatus::none(),
        };

        if days < 0.0 {
            InventoryStatus::new(
                StatusColor::OnTime,
                format!("{} {}", format_number(-days), self.labels.days_early),
            )
        } else if days == 0.0 {
            InventoryStatus::new(StatusColor::OnTime, self.labels.on_time.clone())
        } else {
            let color = match code {
                Some(c) if (0..=100).contains(&c) => StatusColor::gradient(c),
                _ => StatusColor::Short,
            };
            InventoryStatus::new(
                color,
                format!("{} {}", format_number(days), self.labels.days_late),
            )
        }
    }
}

// ==========================================
// 辅助函数
// ==========================================

/// 延迟原始值换算为天（保留 1 位小数）
pub fn delay_days(raw: i64) -> f64 {
    js_round(raw as f64 / DELAY_UNITS_PER_DAY * 10.0) / 10.0
}

/// 覆盖率标签: round(computed_color) + "%"，缺失时为空
fn coverage_label(computed_color: Option<f64>) -> String {
    match computed_color {
        Some(v) if v.is_finite() => format!("{}%", format_number(js_round(v))),
        _ => String::new(),
    }
}

/// 按前端 parseInt 规则解析整数
///
/// - 忽略前导空白
/// - 可选正负号
/// - 读取连续数字前缀，遇到非数字停止
/// - 无数字前缀 → None
/// - 超出 i64 范围 → 饱和为 i64::MAX / -i64::MAX（分支判定与前端大数一致）
pub fn parse_js_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let prefix: &str = {
        let end = digits
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(digits.len());
        &digits[..end]
    };
    if prefix.is_empty() {
        return None;
    }

    // prefix 全为数字，解析失败只可能是溢出
    let value: i64 = prefix.parse().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> InventoryStatusClassifier {
        InventoryStatusClassifier::with_labels(StatusLabels {
            days_early: "days early".to_string(),
            on_time: "on time".to_string(),
            days_late: "days late".to_string(),
        })
    }

    fn coverage(color: &str, computed: f64) -> StatusFields {
        StatusFields {
            color: Some(color.to_string()),
            inventory_item: true,
            computed_color: Some(computed),
            ..Default::default()
        }
    }

    fn delayed(color: Option<&str>, delay: i64, criticality: i64) -> StatusFields {
        StatusFields {
            color: color.map(|c| c.to_string()),
            delay: Some(delay),
            criticality: Some(criticality),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_or_empty_color() {
        let c = classifier();
        assert!(c.classify(&StatusFields::default()).is_none());
        assert!(c
            .classify(&StatusFields {
                color: Some(String::new()),
                delay: Some(-17280),
                ..Default::default()
            })
            .is_none());
    }

    #[test]
    fn test_coverage_branch() {
        let c = classifier();

        let status = c.classify(&coverage("0", 42.6));
        assert_eq!(
            status.into_pair(),
            (Some("rgba(255,0,0,0.5)".to_string()), "43%".to_string())
        );

        let status = c.classify(&coverage("150", 77.0));
        assert_eq!(
            status.into_pair(),
            (Some("rgba(0,128,0,0.5)".to_string()), "77%".to_string())
        );

        assert!(c.classify(&coverage("999999", 12.0)).is_none());

        let status = c.classify(&coverage("50", 49.5));
        assert_eq!(status.color, Some(StatusColor::Gradient { green: 128 }));
        assert_eq!(status.label, "50%");
    }

    #[test]
    fn test_coverage_branch_leadtime_flag() {
        let c = classifier();
        let fields = StatusFields {
            color: Some("100".to_string()),
            leadtime: true,
            computed_color: Some(100.0),
            ..Default::default()
        };
        assert_eq!(c.classify(&fields).color, Some(StatusColor::OnTime));
    }

    #[test]
    fn test_coverage_branch_not_a_number() {
        let c = classifier();
        assert!(c.classify(&coverage("n/a", 10.0)).is_none());
    }

    #[test]
    fn test_delay_branch() {
        let c = classifier();

        let status = c.classify(&delayed(None, -17280, 50));
        // color 缺失直接返回
        assert!(status.is_none());

        let status = c.classify(&delayed(Some("40"), -17280, 50));
        assert_eq!(
            status.into_pair(),
            (Some("rgba(0,128,0,0.5)".to_string()), "2 days early".to_string())
        );

        let status = c.classify(&delayed(Some("40"), 8640, 10));
        assert_eq!(
            status.into_pair(),
            (Some("rgba(255,102,0,0.5)".to_string()), "1 days late".to_string())
        );

        let status = c.classify(&delayed(Some("40"), 0, 10));
        assert_eq!(status.color, Some(StatusColor::OnTime));
        assert_eq!(status.label, "on time");
    }

    #[test]
    fn test_delay_branch_code_out_of_range_is_red() {
        let c = classifier();
        let status = c.classify(&delayed(Some("101"), 12960, 1));
        assert_eq!(status.color, Some(StatusColor::Short));
        assert_eq!(status.label, "1.5 days late");

        let status = c.classify(&delayed(Some("-1"), 8640, 1));
        assert_eq!(status.color, Some(StatusColor::Short));
    }

    #[test]
    fn test_delay_branch_gradient_edges() {
        let c = classifier();
        let status = c.classify(&delayed(Some("100"), 8640, 1));
        assert_eq!(status.color, Some(StatusColor::Gradient { green: 255 }));

        let status = c.classify(&delayed(Some("0"), 8640, 1));
        assert_eq!(status.color, Some(StatusColor::Gradient { green: 0 }));
        assert_eq!(status.color_css().as_deref(), Some("rgba(255,0,0,0.5)"));

        let status = c.classify(&delayed(Some("late"), 8640, 1));
        assert_eq!(status.color, Some(StatusColor::Short));
    }

    #[test]
    fn test_coverage_branch_past_sentinel_and_negative() {
        let c = classifier();
        assert_eq!(
            c.classify(&coverage("1000000", 1.0)).color,
            Some(StatusColor::Gradient { green: 2_550_000 })
        );
        assert_eq!(
            c.classify(&coverage("-5", 1.0)).color,
            Some(StatusColor::Gradient { green: -13 })
        );
        assert_eq!(
            c.classify(&coverage("99999999999999999999", 1.0)).color,
            Some(StatusColor::gradient(i64::MAX))
        );
    }

    #[test]
    fn test_delay_branch_criticality_sentinel() {
        let c = classifier();
        for delay in [-17280, 0, 8640] {
            assert!(c.classify(&delayed(Some("40"), delay, 999)).is_none());
        }

        let mut fields = delayed(Some("40"), 8640, 1);
        fields.plan_criticality = Some(999);
        assert!(c.classify(&fields).is_none());
    }

    #[test]
    fn test_delay_branch_without_delay() {
        let c = classifier();
        let fields = StatusFields {
            color: Some("40".to_string()),
            ..Default::default()
        };
        assert!(c.classify(&fields).is_none());
    }

    #[test]
    fn test_small_negative_delay_rounds_to_on_time() {
        let c = classifier();
        let status = c.classify(&delayed(Some("10"), -100, 1));
        assert_eq!(status.label, "on time");
    }

    #[test]
    fn test_classify_is_idempotent() {
        let c = classifier();
        let fields = delayed(Some("40"), 8640, 10);
        assert_eq!(c.classify(&fields), c.classify(&fields));
    }

    #[test]
    fn test_delay_days() {
        assert_eq!(delay_days(8640), 1.0);
        assert_eq!(delay_days(-17280), -2.0);
        assert_eq!(delay_days(4320), 0.5);
        assert_eq!(delay_days(0), 0.0);
    }

    #[test]
    fn test_parse_js_int() {
        assert_eq!(parse_js_int("150"), Some(150));
        assert_eq!(parse_js_int("  -42abc"), Some(-42));
        assert_eq!(parse_js_int("+7"), Some(7));
        assert_eq!(parse_js_int("12.9"), Some(12));
        assert_eq!(parse_js_int("abc"), None);
        assert_eq!(parse_js_int("99999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_js_int("-99999999999999999999x"), Some(-i64::MAX));
        assert_eq!(parse_js_int("-"), None);
        assert_eq!(parse_js_int(""), None);
    }
}
