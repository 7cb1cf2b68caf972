//! 存储模块 - 配置文件与神煞元数据

pub mod config;
pub mod metadata;
