//! 错误类型定义
//!
//! 计算路径本身不向外抛错：非法输入一律降级为“不命中”。
//! 这里的错误只用于显式校验（`check_params`、时间层级解析）与规则故障记录。

use thiserror::Error;

/// 神煞引擎错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShenShaError {
    #[error("无效天干: {0}")]
    InvalidStem(String),

    #[error("无效地支: {0}")]
    InvalidBranch(String),

    #[error("无效季节: {0}")]
    InvalidSeason(String),

    #[error("无效干支: {0}")]
    InvalidGanZhi(String),

    #[error("缺少必要字段: {0}")]
    MissingField(&'static str),

    #[error("不支持的时间层级: {0}")]
    UnknownTimeLayer(String),

    #[error("规则 {name} 执行失败: {message}")]
    RuleFault { name: String, message: String },
}

pub type ShenShaResult<T> = std::result::Result<T, ShenShaError>;
