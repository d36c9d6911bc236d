// ==========================================
// 工序计划甘特图 - 引擎层错误类型
// ==========================================

use thiserror::Error;

/// 甘特图交互错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("预约条不存在: index={0}")]
    AppointmentNotFound(usize),

    #[error("工序计划不存在: reference={0}")]
    ReferenceNotFound(String),

    #[error("禁止跨资源移动: reference={reference}, from={from}, to={to}")]
    CrossResourceMove {
        reference: String,
        from: u32,
        to: u32,
    },

    #[error("时间区间无效: reference={reference}, 结束时间早于开始时间")]
    InvalidInterval { reference: String },
}

/// Result 类型别名
pub type BoardResult<T> = Result<T, BoardError>;
