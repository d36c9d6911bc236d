// ==========================================
// 工序计划甘特图 - 导入层
// ==========================================
// 职责: 读取计划数据源，规范化为 OperationPlan
// 支持: JSON, CSV, Excel, SQLite
// ==========================================

pub mod error;
pub mod file_parser;
pub mod planning_source;
pub mod row_normalizer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{
    CsvParser, ExcelParser, FileParser, JsonParser, PlanningResponse, UniversalFileParser,
};
pub use planning_source::{
    fetch_many, merge_responses, FilePlanningSource, PlanningSource, RepositoryPlanningSource,
};
pub use row_normalizer::{parse_datetime, RawRow, RowNormalizer};
