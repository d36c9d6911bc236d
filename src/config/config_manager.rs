// ==========================================
// 工序计划甘特图 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 规则: 未配置的项使用 GanttViewConfig::default()
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::gantt_view_config::GanttViewConfig;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::types::SchedulerView;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// 全局作用域
const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（自动建表）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ConfigError::LockError(e.to_string()))?;
            ensure_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 列出 global scope 的全部配置（按 key 排序）
    pub fn list_configs(&self) -> ConfigResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut configs = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            configs.insert(key, value);
        }
        Ok(configs)
    }

    /// 读取甘特图视图配置（默认值 + 覆写 + 校验）
    ///
    /// 格式错误的覆写值记录告警后忽略
    pub fn get_view_config(&self) -> ConfigResult<GanttViewConfig> {
        let mut config = GanttViewConfig::default();
        apply_stored_overrides(&mut config, &self.list_configs()?);
        config.validate()?;
        Ok(config)
    }

    /// 更新配置项
    ///
    /// # 返回
    /// - Err(UnknownKey): 非甘特图配置项
    /// - Err(InvalidValue): 值格式错误或与现有配置组合后校验失败
    pub fn update_config(&self, key: &str, value: &str) -> ConfigResult<()> {
        if !config_keys::ALL.contains(&key) {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut candidate = self.get_view_config()?;
        apply_override(&mut candidate, key, value)?;
        candidate.validate()?;

        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        debug!(config_key = key, value, "配置已更新");
        Ok(())
    }

    /// 删除配置项（恢复默认值）
    pub fn reset_config(&self, key: &str) -> ConfigResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
        )?;
        Ok(affected > 0)
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let configs = self.list_configs()?;
        serde_json::to_string(&configs).map_err(|e| ConfigError::ReadError {
            key: "*".to_string(),
            message: e.to_string(),
        })
    }

    /// 从配置快照恢复配置
    ///
    /// 写入前以 "默认值 + 现有覆写 + 快照" 组合校验，任一项不合法则整体拒绝
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    /// - Err(UnknownKey / InvalidValue): 快照不合法，存储保持不变
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> ConfigResult<usize> {
        let configs: BTreeMap<String, String> =
            serde_json::from_str(snapshot_json).map_err(|e| ConfigError::ReadError {
                key: "*".to_string(),
                message: e.to_string(),
            })?;

        let mut candidate = GanttViewConfig::default();
        let mut existing = self.list_configs()?;
        existing.retain(|key, _| !configs.contains_key(key));
        apply_stored_overrides(&mut candidate, &existing);
        for (key, value) in configs.iter() {
            if !config_keys::ALL.contains(&key.as_str()) {
                return Err(ConfigError::UnknownKey(key.clone()));
            }
            apply_override(&mut candidate, key, value)?;
        }
        candidate.validate()?;

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let mut count = 0;
        for (key, value) in configs.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3",
                params![GLOBAL_SCOPE, key, value],
            )?;
        }
        tx.commit()?;
        Ok(count)
    }
}

// ==========================================
// 覆写应用
// ==========================================

/// 应用已存储的覆写；未知键跳过，格式错误记录告警后忽略
fn apply_stored_overrides(config: &mut GanttViewConfig, configs: &BTreeMap<String, String>) {
    for (key, value) in configs {
        if !config_keys::ALL.contains(&key.as_str()) {
            continue;
        }
        if let Err(e) = apply_override(config, key, value) {
            warn!(config_key = %key, raw_value = %value, error = %e, "配置格式错误，使用默认值");
        }
    }
}

fn apply_override(config: &mut GanttViewConfig, key: &str, value: &str) -> ConfigResult<()> {
    let value = value.trim();
    match key {
        config_keys::TIME_ZONE => config.time_zone = value.to_string(),
        config_keys::VIEWS => {
            config.views = value
                .split(',')
                .map(|v| {
                    SchedulerView::from_str_name(v)
                        .ok_or_else(|| ConfigError::invalid(key, v, "未知视图"))
                })
                .collect::<ConfigResult<Vec<_>>>()?;
        }
        config_keys::CURRENT_VIEW => {
            config.current_view = SchedulerView::from_str_name(value)
                .ok_or_else(|| ConfigError::invalid(key, value, "未知视图"))?;
        }
        config_keys::FIRST_DAY_OF_WEEK => config.first_day_of_week = parse_num(key, value)?,
        config_keys::START_DAY_HOUR => config.start_day_hour = parse_num(key, value)?,
        config_keys::END_DAY_HOUR => config.end_day_hour = parse_num(key, value)?,
        config_keys::CELL_DURATION => config.cell_duration = parse_num(key, value)?,
        config_keys::RESOURCE_COLOR => config.resource_color = value.to_string(),
        config_keys::HIGHLIGHT_COLOR => config.highlight_color = value.to_string(),
        config_keys::APPOINTMENT_COLOR => config.appointment_color = value.to_string(),
        config_keys::VIEW_CUTOFF => {
            config.view_cutoff = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map_err(|_| ConfigError::invalid(key, value, "期望 YYYY-MM-DD"))?;
        }
        config_keys::PAGE_SIZE => config.page_size = parse_num(key, value)?,
        config_keys::HEIGHT_PERCENT => config.height_percent = parse_num(key, value)?,
        other => return Err(ConfigError::UnknownKey(other.to_string())),
    }
    Ok(())
}

fn parse_num<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value
        .parse::<T>()
        .map_err(|_| ConfigError::invalid(key, value, "期望非负整数"))
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 控件
    pub const TIME_ZONE: &str = "gantt.time_zone";
    pub const VIEWS: &str = "gantt.views"; // 逗号分隔
    pub const CURRENT_VIEW: &str = "gantt.current_view";
    pub const FIRST_DAY_OF_WEEK: &str = "gantt.first_day_of_week";
    pub const START_DAY_HOUR: &str = "gantt.start_day_hour";
    pub const END_DAY_HOUR: &str = "gantt.end_day_hour";
    pub const CELL_DURATION: &str = "gantt.cell_duration";
    pub const HEIGHT_PERCENT: &str = "gantt.height_percent";

    // 颜色
    pub const RESOURCE_COLOR: &str = "gantt.resource_color";
    pub const HIGHLIGHT_COLOR: &str = "gantt.highlight_color";
    pub const APPOINTMENT_COLOR: &str = "gantt.appointment_color";

    // 数据
    pub const VIEW_CUTOFF: &str = "gantt.view_cutoff"; // YYYY-MM-DD
    pub const PAGE_SIZE: &str = "gantt.page_size";

    pub const ALL: &[&str] = &[
        TIME_ZONE,
        VIEWS,
        CURRENT_VIEW,
        FIRST_DAY_OF_WEEK,
        START_DAY_HOUR,
        END_DAY_HOUR,
        CELL_DURATION,
        HEIGHT_PERCENT,
        RESOURCE_COLOR,
        HIGHLIGHT_COLOR,
        APPOINTMENT_COLOR,
        VIEW_CUTOFF,
        PAGE_SIZE,
    ];
}
