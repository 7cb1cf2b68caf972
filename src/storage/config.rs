//! 配置文件管理模块

use crate::core::models::EngineConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// 配置管理器
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// 创建配置管理器
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// 获取默认配置路径
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "shensha", "ShenShaEngine")
            .map(|d| d.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// 加载配置，文件不存在时返回默认值
    pub fn load(&self) -> Result<EngineConfig> {
        if self.config_path.exists() {
            let content = std::fs::read_to_string(&self.config_path)
                .with_context(|| format!("读取配置失败: {}", self.config_path.display()))?;
            let config = serde_json::from_str(&content)
                .with_context(|| format!("解析配置失败: {}", self.config_path.display()))?;
            tracing::info!("已加载配置: {}", self.config_path.display());
            Ok(config)
        } else {
            tracing::info!("配置文件不存在，使用默认配置: {}", self.config_path.display());
            Ok(EngineConfig::default())
        }
    }

    /// 保存配置
    pub fn save(&self, config: &EngineConfig) -> Result<()> {
        // 确保目录存在
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(config)?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// 重置为默认配置
    pub fn reset(&self) -> Result<()> {
        self.save(&EngineConfig::default())
    }
}
