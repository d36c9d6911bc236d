// ==========================================
// 工序计划甘特图 - 计划行仓储
// ==========================================
// 表: operationplan_resource（工序计划 × 资源 的本地缓存）
// 输出: 与数据源响应一致的行结构（operationplan__ 前缀字段）
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::{configure_sqlite_connection, ensure_schema};
use crate::importer::row_normalizer::RawRow;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex};

// ==========================================
// OperationPlanRow - 计划行（存储结构）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationPlanRow {
    pub resource: String,
    pub reference: String,
    pub operation: Option<String>,
    pub item: Option<String>,
    pub startdate: String,
    pub enddate: String,
    pub quantity: Option<f64>,
    pub status: Option<String>,
    pub plan_type: Option<String>,
    pub delay: Option<i64>,
    pub criticality: Option<i64>,
    pub color: Option<String>,
    pub inventory_item: bool,
    pub leadtime: bool,
    pub computed_color: Option<f64>,
    pub demands: Vec<(f64, String)>,
}

impl OperationPlanRow {
    /// 转换为数据源行结构
    pub fn to_raw_row(&self) -> RawRow {
        let mut row = RawRow::new();
        let opt_str = |v: &Option<String>| v.clone().map(Value::String).unwrap_or(Value::Null);

        row.insert("resource".into(), Value::String(self.resource.clone()));
        row.insert("operationplan__reference".into(), Value::String(self.reference.clone()));
        row.insert("operationplan__operation__name".into(), opt_str(&self.operation));
        row.insert("operationplan__item__name".into(), opt_str(&self.item));
        row.insert("operationplan__startdate".into(), Value::String(self.startdate.clone()));
        row.insert("operationplan__enddate".into(), Value::String(self.enddate.clone()));
        row.insert("operationplan__quantity".into(), self.quantity.map(Value::from).unwrap_or(Value::Null));
        row.insert("operationplan__status".into(), opt_str(&self.status));
        row.insert("operationplan__type".into(), opt_str(&self.plan_type));
        row.insert("operationplan__delay".into(), self.delay.map(Value::from).unwrap_or(Value::Null));
        row.insert(
            "operationplan__criticality".into(),
            self.criticality.map(Value::from).unwrap_or(Value::Null),
        );
        row.insert("color".into(), opt_str(&self.color));
        row.insert("inventory_item".into(), Value::Bool(self.inventory_item));
        row.insert("leadtime".into(), Value::Bool(self.leadtime));
        row.insert(
            "computed_color".into(),
            self.computed_color.map(Value::from).unwrap_or(Value::Null),
        );
        row.insert(
            "demands".into(),
            Value::Array(
                self.demands
                    .iter()
                    .map(|(qty, name)| serde_json::json!([qty, name]))
                    .collect(),
            ),
        );
        row
    }
}

// ==========================================
// OperationPlanRowRepository - 计划行仓储
// ==========================================
pub struct OperationPlanRowRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OperationPlanRowRepository {
    /// 创建新的仓储实例（自动建表）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = Connection::open(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        configure_sqlite_connection(&conn)?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            ensure_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入单行
    pub fn insert(&self, row: &OperationPlanRow) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        insert_row(&conn, row)?;
        Ok(())
    }

    /// 批量插入（事务化）
    ///
    /// # 返回
    /// - Ok(usize): 插入行数
    pub fn insert_batch(&self, rows: &[OperationPlanRow]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        for row in rows {
            insert_row(&tx, row)?;
        }
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(rows.len())
    }

    /// 查询行记录（按资源、开始时间排序）
    ///
    /// # 参数
    /// - limit: 最大行数；None 表示不限
    pub fn list_rows(&self, limit: Option<usize>) -> RepositoryResult<Vec<RawRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                resource, reference, operation, item,
                startdate, enddate, quantity, status, plan_type,
                delay, criticality, color, inventory_item, leadtime,
                computed_color, demands
            FROM operationplan_resource
            ORDER BY resource, startdate, id
            LIMIT ?1
            "#,
        )?;

        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let rows = stmt
            .query_map(params![limit], map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(mut row, demands)| -> RepositoryResult<RawRow> {
                row.demands = match demands {
                    Some(raw) if !raw.is_empty() => serde_json::from_str(&raw)?,
                    _ => Vec::new(),
                };
                Ok(row.to_raw_row())
            })
            .collect()
    }

    /// 总行数
    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM operationplan_resource", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// 清空
    pub fn delete_all(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute("DELETE FROM operationplan_resource", [])?)
    }
}

fn insert_row(conn: &Connection, row: &OperationPlanRow) -> RepositoryResult<()> {
    let demands = serde_json::to_string(&row.demands)?;
    conn.execute(
        r#"
        INSERT INTO operationplan_resource (
            resource, reference, operation, item,
            startdate, enddate, quantity, status, plan_type,
            delay, criticality, color, inventory_item, leadtime,
            computed_color, demands
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
        "#,
        params![
            row.resource,
            row.reference,
            row.operation,
            row.item,
            row.startdate,
            row.enddate,
            row.quantity,
            row.status,
            row.plan_type,
            row.delay,
            row.criticality,
            row.color,
            row.inventory_item,
            row.leadtime,
            row.computed_color,
            demands,
        ],
    )?;
    Ok(())
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<(OperationPlanRow, Option<String>)> {
    Ok((
        OperationPlanRow {
            resource: row.get(0)?,
            reference: row.get(1)?,
            operation: row.get(2)?,
            item: row.get(3)?,
            startdate: row.get(4)?,
            enddate: row.get(5)?,
            quantity: row.get(6)?,
            status: row.get(7)?,
            plan_type: row.get(8)?,
            delay: row.get(9)?,
            criticality: row.get(10)?,
            color: row.get(11)?,
            inventory_item: row.get(12)?,
            leadtime: row.get(13)?,
            computed_color: row.get(14)?,
            demands: Vec::new(),
        },
        row.get(15)?,
    ))
}
