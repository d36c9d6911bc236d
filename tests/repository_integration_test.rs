// ==========================================
// Repository 集成测试
// ==========================================
// 测试目标: SQLite 缓存 → 数据源 → 甘特图（共享连接）
// ==========================================


use chrono::NaiveDate;
use opplan_gantt::config::{config_keys, ConfigManager};
use opplan_gantt::db::open_sqlite_connection;
use opplan_gantt::repository::{OperationPlanRow, OperationPlanRowRepository};
use opplan_gantt::{GanttBoard, GanttBuilder, PlanningSource, RepositoryPlanningSource};
use std::sync::{Arc, Mutex};
use test_helpers::{create_test_db, english_classifier};

fn row(reference: &str, resource: &str, day: u32, demand: &str) -> OperationPlanRow {
    OperationPlanRow {
        resource: resource.to_string(),
        reference: reference.to_string(),
        operation: Some(format!("Operation {}", reference)),
        startdate: format!("2024-04-{:02} 08:00:00", day),
        enddate: format!("2024-04-{:02} 10:00:00", day),
        quantity: Some(5.0),
        status: Some("confirmed".to_string()),
        delay: Some(0),
        criticality: Some(1),
        color: Some("40".to_string()),
        demands: vec![(5.0, demand.to_string())],
        ..Default::default()
    }
}

#[test]
fn test_insert_count_delete() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let repo = OperationPlanRowRepository::new(&db_path).unwrap();

    assert_eq!(repo.count().unwrap(), 0);
    repo.insert(&row("1", "Oven", 2, "SO-1")).unwrap();
    assert_eq!(
        repo.insert_batch(&[row("2", "Mixer", 3, "SO-1"), row("3", "Oven", 4, "SO-2")])
            .unwrap(),
        2
    );
    assert_eq!(repo.count().unwrap(), 3);
    assert_eq!(repo.list_rows(None).unwrap().len(), 3);
    assert_eq!(repo.list_rows(Some(2)).unwrap().len(), 2);

    assert_eq!(repo.delete_all().unwrap(), 3);
    assert!(repo.list_rows(None).unwrap().is_empty());
}

#[tokio::test]
async fn test_cached_rows_to_board() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = Arc::new(Mutex::new(open_sqlite_connection(&db_path).unwrap()));

    let repo = OperationPlanRowRepository::from_connection(conn.clone()).unwrap();
    repo.insert_batch(&[
        row("1", "Oven", 2, "SO-1"),
        row("2", "Mixer", 3, "SO-1"),
        row("3", "Oven", 4, "SO-2"),
    ])
    .unwrap();

    let manager = ConfigManager::from_connection(conn).unwrap();
    manager.update_config(config_keys::PAGE_SIZE, "10").unwrap();
    let config = manager.get_view_config().unwrap();

    let source = RepositoryPlanningSource::new(Arc::new(repo));
    let response = source.fetch(config.gantt_format()).await.unwrap();
    assert_eq!(response.rows.len(), 3);

    let now = NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let dataset = GanttBuilder::new(config, english_classifier()).build_from_response(&response, now);
    assert_eq!(dataset.resources.len(), 2);
    assert_eq!(dataset.skipped_rows, 0);
    assert!(dataset
        .appointments
        .iter()
        .all(|a| a.inventory_status.label == "on time"));

    let mut board = GanttBoard::new(dataset, "#081a45");
    let selection = board.select_reference("2").unwrap();
    assert_eq!(selection.highlighted, 1);
    assert_eq!(selection.bordered, 2);
    assert_eq!(selection.plan.resource, "Mixer");
}
