// ==========================================
// 工序计划甘特图 - 计划数据源
// ==========================================
// 职责: 按响应格式读取计划行记录
// 实现: 文件数据源 (JSON/CSV/Excel) / SQLite 数据源
// ==========================================

use crate::domain::types::ResponseFormat;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{FileParser, PlanningResponse, UniversalFileParser};
use crate::repository::OperationPlanRowRepository;
use async_trait::async_trait;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};

// ==========================================
// PlanningSource Trait
// ==========================================
// 用途: 计划数据读取接口
// 实现者: FilePlanningSource, RepositoryPlanningSource
#[async_trait]
pub trait PlanningSource: Send + Sync {
    /// 数据源描述（用于日志）
    fn describe(&self) -> String;

    /// 读取计划数据
    ///
    /// # 参数
    /// - format: 响应格式；Gantt 格式按 page_size 截断行数
    ///
    /// # 返回
    /// - Ok(PlanningResponse): 行记录 + 总记录数
    /// - Err: 读取/解析失败
    async fn fetch(&self, format: ResponseFormat) -> ImportResult<PlanningResponse>;
}

// ==========================================
// FilePlanningSource - 文件数据源
// ==========================================
pub struct FilePlanningSource {
    path: PathBuf,
}

impl FilePlanningSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PlanningSource for FilePlanningSource {
    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }

    #[instrument(skip(self), fields(source = %self.describe()))]
    async fn fetch(&self, format: ResponseFormat) -> ImportResult<PlanningResponse> {
        let path = self.path.clone();
        let mut response = tokio::task::spawn_blocking(move || UniversalFileParser.parse(&path))
            .await
            .map_err(|e| ImportError::InternalError(format!("解析任务失败: {}", e)))??;

        if let Some(page_size) = format.page_size() {
            response.truncate(page_size);
        }

        info!(
            rows = response.rows.len(),
            records = response.total_records(),
            "文件数据源读取完成"
        );
        Ok(response)
    }
}

// ==========================================
// RepositoryPlanningSource - SQLite 数据源
// ==========================================
pub struct RepositoryPlanningSource {
    repo: Arc<OperationPlanRowRepository>,
}

impl RepositoryPlanningSource {
    pub fn new(repo: Arc<OperationPlanRowRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl PlanningSource for RepositoryPlanningSource {
    fn describe(&self) -> String {
        "sqlite:operationplan_resource".to_string()
    }

    #[instrument(skip(self), fields(source = %self.describe()))]
    async fn fetch(&self, format: ResponseFormat) -> ImportResult<PlanningResponse> {
        let repo = Arc::clone(&self.repo);
        let limit = format.page_size();

        let (rows, total) = tokio::task::spawn_blocking(move || {
            let total = repo.count()?;
            let rows = repo.list_rows(limit)?;
            Ok::<_, ImportError>((rows, total))
        })
        .await
        .map_err(|e| ImportError::InternalError(format!("查询任务失败: {}", e)))??;

        debug!(rows = rows.len(), total, "SQLite 数据源读取完成");
        Ok(PlanningResponse {
            rows,
            records: Some(total),
        })
    }
}

// ==========================================
// 批量读取
// ==========================================

/// 并发读取多个数据源
///
/// 每个数据源的结果独立返回，某个失败不影响其他
pub async fn fetch_many(
    sources: &[Box<dyn PlanningSource>],
    format: ResponseFormat,
) -> Vec<ImportResult<PlanningResponse>> {
    join_all(sources.iter().map(|s| s.fetch(format))).await
}

/// 合并多个响应（总记录数累加）
pub fn merge_responses(responses: Vec<PlanningResponse>) -> PlanningResponse {
    let mut merged = PlanningResponse::default();
    let mut total = 0;
    for response in responses {
        total += response.total_records();
        merged.rows.extend(response.rows);
    }
    merged.records = Some(total);
    merged
}
