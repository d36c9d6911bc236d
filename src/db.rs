// ==========================================
// 工序计划甘特图 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供最小 schema（配置表 + 计划行缓存表）
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 默认数据库文件名
pub const DEFAULT_DB_FILE: &str = "opplan_gantt.db";

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS operationplan_resource (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            resource TEXT NOT NULL,
            reference TEXT NOT NULL,
            operation TEXT,
            item TEXT,
            startdate TEXT NOT NULL,
            enddate TEXT NOT NULL,
            quantity REAL,
            status TEXT,
            plan_type TEXT,
            delay INTEGER,
            criticality INTEGER,
            color TEXT,
            inventory_item INTEGER NOT NULL DEFAULT 0,
            leadtime INTEGER NOT NULL DEFAULT 0,
            computed_color REAL,
            demands TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_opplan_resource_start
            ON operationplan_resource (resource, startdate);
        "#,
    )
}

/// 默认数据库路径（用户数据目录下）
pub fn default_db_path() -> String {
    let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("opplan-gantt");
    if let Err(e) = std::fs::create_dir_all(&path) {
        tracing::warn!(error = %e, "无法创建数据目录，使用当前目录");
        return DEFAULT_DB_FILE.to_string();
    }
    path.push(DEFAULT_DB_FILE);
    path.to_string_lossy().to_string()
}
