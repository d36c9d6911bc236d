// ==========================================
// 库存状态分类 集成测试
// ==========================================
// 测试目标: 从外部行记录出发（规范化 + 分类）验证颜色与标签
// ==========================================


use opplan_gantt::RowNormalizer;
use serde_json::{json, Value};
use test_helpers::{as_row, english_classifier};

fn classify(value: Value) -> (Option<String>, String) {
    let fields = RowNormalizer::new().status_fields(&as_row(value));
    english_classifier().classify(&fields).into_pair()
}

fn none() -> (Option<String>, String) {
    (None, String::new())
}

#[test]
fn test_absent_or_empty_color_has_no_status() {
    assert_eq!(classify(json!({"delay": 8640, "criticality": 1})), none());
    assert_eq!(classify(json!({"color": "", "delay": 8640})), none());
}

#[test]
fn test_null_color_still_classifies_delay() {
    assert_eq!(
        classify(json!({"color": null, "delay": -17280, "criticality": 1})),
        (Some("rgba(0,128,0,0.5)".to_string()), "2 days early".to_string())
    );
    assert_eq!(
        classify(json!({"color": null, "delay": 0, "criticality": 1})),
        (Some("rgba(0,128,0,0.5)".to_string()), "on time".to_string())
    );
    // 非数值代码 + 延迟 → 红色
    assert_eq!(
        classify(json!({"color": null, "delay": 8640, "criticality": 1})),
        (Some("rgba(255,0,0,0.5)".to_string()), "1 days late".to_string())
    );
    // 覆盖率分支需要数值代码
    assert_eq!(classify(json!({"color": null, "inventory_item": true})), none());
}

#[test]
fn test_not_tracked_sentinel_for_both_flags() {
    assert_eq!(
        classify(json!({"color": "999999", "inventory_item": true, "computed_color": 55})),
        none()
    );
    assert_eq!(
        classify(json!({"color": "999999", "leadtime": 1, "computed_color": 0})),
        none()
    );
}

#[test]
fn test_coverage_zero_is_red() {
    assert_eq!(
        classify(json!({"color": "0", "inventory_item": true, "computed_color": 42.6})),
        (Some("rgba(255,0,0,0.5)".to_string()), "43%".to_string())
    );
}

#[test]
fn test_coverage_above_hundred_is_green() {
    assert_eq!(
        classify(json!({"color": "150", "inventory_item": true, "computed_color": 77})),
        (Some("rgba(0,128,0,0.5)".to_string()), "77%".to_string())
    );
}

#[test]
fn test_coverage_gradient_from_numeric_color() {
    assert_eq!(
        classify(json!({"color": 25, "inventory_item": "yes", "computed_color": "24.7"})),
        (Some("rgba(255,64,0,0.5)".to_string()), "25%".to_string())
    );
}

#[test]
fn test_early_delay() {
    assert_eq!(
        classify(json!({"color": "80", "delay": -17280, "criticality": 50})),
        (Some("rgba(0,128,0,0.5)".to_string()), "2 days early".to_string())
    );
}

#[test]
fn test_late_delay_gradient() {
    assert_eq!(
        classify(json!({"color": "40", "delay": 8640, "criticality": 10})),
        (Some("rgba(255,102,0,0.5)".to_string()), "1 days late".to_string())
    );
}

#[test]
fn test_late_delay_uses_prefixed_fallback() {
    assert_eq!(
        classify(json!({"color": "40", "delay": "", "operationplan__delay": "8640", "criticality": 10})),
        (Some("rgba(255,102,0,0.5)".to_string()), "1 days late".to_string())
    );
}

#[test]
fn test_criticality_sentinel_regardless_of_delay() {
    for delay in [-17280, 0, 8640, 86400] {
        assert_eq!(
            classify(json!({"color": "40", "delay": delay, "criticality": 999})),
            none()
        );
        assert_eq!(
            classify(json!({"color": "40", "delay": delay, "operationplan__criticality": "999"})),
            none()
        );
    }
}

#[test]
fn test_on_time() {
    assert_eq!(
        classify(json!({"color": "40", "delay": 0, "criticality": 1})),
        (Some("rgba(0,128,0,0.5)".to_string()), "on time".to_string())
    );
}

#[test]
fn test_classification_is_idempotent() {
    let row = json!({"color": "40", "delay": 8640, "criticality": 10});
    assert_eq!(classify(row.clone()), classify(row));
}

#[test]
fn test_localized_labels() {
    let classifier = opplan_gantt::InventoryStatusClassifier::for_locale("zh-CN");
    let fields = RowNormalizer::new()
        .status_fields(&as_row(json!({"color": "40", "delay": 0, "criticality": 1})));
    assert_eq!(classifier.classify(&fields).label, "准时");
}

#[test]
fn test_late_delay_gradient_inclusive_edges() {
    assert_eq!(
        classify(json!({"color": "100", "delay": 8640, "criticality": 1})),
        (Some("rgba(255,255,0,0.5)".to_string()), "1 days late".to_string())
    );
    assert_eq!(
        classify(json!({"color": "0", "delay": 8640, "criticality": 1})),
        (Some("rgba(255,0,0,0.5)".to_string()), "1 days late".to_string())
    );
}

#[test]
fn test_late_delay_non_numeric_code_is_red() {
    assert_eq!(
        classify(json!({"color": "n/a", "delay": 17280, "criticality": 1})),
        (Some("rgba(255,0,0,0.5)".to_string()), "2 days late".to_string())
    );
}

#[test]
fn test_coverage_codes_outside_green_band() {
    assert_eq!(
        classify(json!({"color": "1000000", "inventory_item": true, "computed_color": 5})),
        (Some("rgba(255,2550000,0,0.5)".to_string()), "5%".to_string())
    );
    assert_eq!(
        classify(json!({"color": "-5", "leadtime": 1, "computed_color": 5})),
        (Some("rgba(255,-13,0,0.5)".to_string()), "5%".to_string())
    );
    assert_eq!(
        classify(json!({"color": "99", "inventory_item": true, "computed_color": 99})),
        (Some("rgba(255,252,0,0.5)".to_string()), "99%".to_string())
    );
}

#[test]
fn test_oversized_code_takes_gradient_path() {
    let (color, label) =
        classify(json!({"color": "99999999999999999999", "inventory_item": true, "computed_color": 1}));
    assert!(color.unwrap().starts_with("rgba(255,"));
    assert_eq!(label, "1%");
}
