// ==========================================
// 预约条导出 集成测试
// ==========================================


use chrono::NaiveDate;
use opplan_gantt::importer::JsonParser;
use opplan_gantt::{AppointmentExporter, GanttBuilder, GanttDataset, GanttViewConfig};
use tempfile::tempdir;
use test_helpers::{english_classifier, sample_response};

fn dataset() -> GanttDataset {
    let response = JsonParser.parse_str(&sample_response().to_string()).unwrap();
    let now = NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    GanttBuilder::new(GanttViewConfig::default(), english_classifier())
        .build_from_response(&response, now)
}

#[test]
fn test_write_csv() {
    let mut buf = Vec::new();
    let count = AppointmentExporter::write_csv(&mut buf, &dataset()).unwrap();
    assert_eq!(count, 4);

    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[0],
        "reference,resource,operation,item,startdate,enddate,quantity,status,delay_days,inventory_status,status_color"
    );
    assert!(lines[1].starts_with("101,Packing,Operation 101,Widget,2024-04-02 08:00:00,2024-04-02 12:00:00,"));
    assert!(lines[1].ends_with(",proposed,1,1 days late,\"rgba(255,102,0,0.5)\""));
}

#[test]
fn test_empty_dataset_writes_nothing() {
    let mut data = dataset();
    data.appointments.clear();

    let mut buf = Vec::new();
    let count = AppointmentExporter::write_csv(&mut buf, &data).unwrap();
    assert_eq!(count, 0);
    assert!(buf.is_empty());
}

#[test]
fn test_export_to_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out").join("gantt.csv");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();

    let count = AppointmentExporter::export_to_path(&path, &dataset()).unwrap();
    assert_eq!(count, 4);

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let references: Vec<String> = reader
        .records()
        .map(|r| r.unwrap()[0].to_string())
        .collect();
    assert_eq!(references, vec!["101", "102", "101", "103"]);
}
