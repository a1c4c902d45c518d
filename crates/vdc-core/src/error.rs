//! 错误定义模块

use thiserror::Error;

/// VDC系统统一错误类型
///
/// 所有变体在调用点都是可恢复的：校验失败与状态转换拒绝不视为系统故障。
#[derive(Error, Debug)]
pub enum VdcError {
    #[error("校验错误: {0}")]
    Validation(String),

    #[error("状态转换被拒绝: 从 {from} 经 {event} ({reason})")]
    TransitionRejected {
        from: String,
        event: String,
        reason: String,
    },

    #[error("登记号冲突: {0}")]
    DuplicateCro(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("数据库错误: {0}")]
    Database(String),

    #[error("存储不可用: {0}")]
    Unavailable(String),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("系统内部错误: {0}")]
    Internal(String),
}

/// VDC系统统一结果类型
pub type Result<T> = std::result::Result<T, VdcError>;
