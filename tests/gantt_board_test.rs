// ==========================================
// 甘特图构建与交互 集成测试
// ==========================================
// 测试目标: 数据源响应 → 数据集 → 点击高亮/描边/拖动校验/重新加载
// ==========================================


use chrono::{NaiveDate, NaiveDateTime};
use opplan_gantt::engine::BoardError;
use opplan_gantt::importer::JsonParser;
use opplan_gantt::{GanttBoard, GanttBuilder, GanttDataset, GanttViewConfig};
use test_helpers::{english_classifier, sample_response};

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn dataset() -> GanttDataset {
    let response = JsonParser.parse_str(&sample_response().to_string()).unwrap();
    GanttBuilder::new(GanttViewConfig::default(), english_classifier())
        .build_from_response(&response, at(2025, 1, 1, 0))
}

fn index_of(board: &GanttBoard, reference: &str, resource: &str) -> usize {
    board
        .dataset()
        .appointments
        .iter()
        .position(|a| a.reference == reference && a.resource == resource)
        .unwrap()
}

#[test]
fn test_build_from_response() {
    let dataset = dataset();
    assert_eq!(dataset.appointments.len(), 4);
    assert_eq!(dataset.skipped_rows, 1);
    assert_eq!(dataset.total_records, 42);

    let names: Vec<&str> = dataset.resources.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(names, vec!["Assembly", "Packing", "Welding"]);
    assert!(dataset.resources.iter().all(|r| r.color == "#081a45"));

    // 2024-03-15 早于截止日
    assert_eq!(dataset.current_date, at(2024, 4, 1, 8));
    assert!(dataset
        .appointments
        .iter()
        .all(|a| a.inventory_status.label == "1 days late"));
}

#[test]
fn test_select_highlights_same_reference_and_borders_shared_demand() {
    let mut board = GanttBoard::new(dataset(), "#081a45");
    let idx = index_of(&board, "101", "Packing");

    let selection = board.select(idx).unwrap();
    assert_eq!(selection.reference, "101");
    assert_eq!(selection.scroll_to, at(2024, 4, 2, 8));
    assert_eq!(selection.highlighted, 2);
    // SO-1: 101@Packing, 102, 101@Assembly
    assert_eq!(selection.bordered, 3);
    assert_eq!(selection.plan.resource, "Packing");

    let welding = index_of(&board, "103", "Welding");
    assert!(!board.dataset().appointments[welding].border);
    assert_eq!(board.display_color(idx).unwrap(), "#081a45");
    assert_eq!(board.display_color(welding).unwrap(), "rgb(0, 255, 0)");
}

#[test]
fn test_reselect_clears_previous_highlight() {
    let mut board = GanttBoard::new(dataset(), "#ff0000");
    board.select_reference("101").unwrap();
    let selection = board.select_reference("103").unwrap();

    assert_eq!(selection.highlighted, 1);
    assert_eq!(selection.bordered, 1);
    let first = index_of(&board, "101", "Packing");
    assert!(!board.dataset().appointments[first].highlighted);
    assert_eq!(board.display_color(first).unwrap(), "rgb(0, 255, 0)");
    assert_eq!(board.selected_reference(), Some("103"));
}

#[test]
fn test_select_unknown() {
    let mut board = GanttBoard::new(dataset(), "#081a45");
    assert_eq!(board.select(99), Err(BoardError::AppointmentNotFound(99)));
    assert_eq!(
        board.select_reference("nope"),
        Err(BoardError::ReferenceNotFound("nope".to_string()))
    );
}

#[test]
fn test_cross_resource_move_rejected() {
    let mut board = GanttBoard::new(dataset(), "#081a45");
    let idx = index_of(&board, "102", "Assembly");
    let own = board.dataset().appointments[idx].resource_id;
    let other = board.dataset().resource_id_of("Welding").unwrap();

    assert!(board.check_update(idx, own).is_ok());
    assert!(matches!(
        board.check_update(idx, other),
        Err(BoardError::CrossResourceMove { .. })
    ));

    let err = board
        .apply_update(idx, other, at(2024, 4, 4, 8), at(2024, 4, 4, 9))
        .unwrap_err();
    assert!(matches!(err, BoardError::CrossResourceMove { from, to, .. } if from == own && to == other));
    assert_eq!(board.dataset().appointments[idx].start, at(2024, 4, 3, 8));
}

#[test]
fn test_apply_update_within_resource() {
    let mut board = GanttBoard::new(dataset(), "#081a45");
    let idx = index_of(&board, "102", "Assembly");
    let own = board.dataset().appointments[idx].resource_id;

    board
        .apply_update(idx, own, at(2024, 4, 4, 8), at(2024, 4, 4, 12))
        .unwrap();
    let a = &board.dataset().appointments[idx];
    assert_eq!(a.start, at(2024, 4, 4, 8));
    assert_eq!(a.plan.end, at(2024, 4, 4, 12));

    assert!(matches!(
        board.apply_update(idx, own, at(2024, 4, 4, 12), at(2024, 4, 4, 8)),
        Err(BoardError::InvalidInterval { .. })
    ));
}

#[test]
fn test_reload_restores_last_selection() {
    let mut board = GanttBoard::new(dataset(), "#081a45");
    board.select_reference("102").unwrap();

    let scroll_to = board.reload(dataset());
    assert_eq!(scroll_to, Some(at(2024, 4, 3, 8)));
    let idx = index_of(&board, "102", "Assembly");
    assert!(board.dataset().appointments[idx].highlighted);

    board.clear_selection();
    assert_eq!(board.reload(dataset()), None);
    assert!(board.dataset().appointments.iter().all(|a| !a.highlighted && !a.border));
}

#[test]
fn test_tooltip_text() {
    let board = GanttBoard::new(dataset(), "#081a45");
    let idx = index_of(&board, "103", "Welding");
    let tooltip = board.tooltip(idx).unwrap();

    assert!(tooltip.starts_with("Name: Operation 103"));
    assert!(tooltip.contains("Start Date: 2024-03-15 08:00:00"));
    assert!(tooltip.contains("Resource: Welding"));
    assert!(tooltip.contains("Delay: 8640"));
    assert!(tooltip.ends_with("Reference: 103"));
}
