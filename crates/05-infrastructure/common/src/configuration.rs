//! 工厂配置定义
//!
//! 配置通过 `config` crate 从可选的 TOML 文件与 `ADSP` 前缀的环境变量加载，
//! 前缀与键之间同样使用 `__` 分隔，例如 `ADSP__FACTORY__ALLOW_BEAN_DEFINITION_OVERRIDING=false`。

use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "ADSP";

/// Bean 工厂配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorySettings {
    /// 是否允许同名 Bean 定义覆盖
    pub allow_bean_definition_overriding: bool,
    /// 是否允许别名重新指向其他名称
    pub allow_alias_overriding: bool,
    /// 是否缓存合并后的 Bean 定义
    pub cache_bean_metadata: bool,
    /// 冻结后是否拒绝定义变更
    pub reject_mutation_after_freeze: bool,
}

impl Default for FactorySettings {
    fn default() -> Self {
        Self {
            allow_bean_definition_overriding: true,
            allow_alias_overriding: true,
            cache_bean_metadata: true,
            reject_mutation_after_freeze: true,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// 日志级别或 EnvFilter 指令
    pub level: String,
    /// 是否输出 JSON 格式
    pub json_format: bool,
    /// 是否显示 target
    pub show_target: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            show_target: true,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSettings {
    /// 工厂配置
    pub factory: FactorySettings,
    /// 日志配置
    pub logging: LoggingSettings,
}

impl ApplicationSettings {
    /// 加载配置
    ///
    /// `path` 指向的文件不存在时仅使用默认值和环境变量。
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            debug!("加载工厂配置文件: {}", path.display());
            builder = builder.add_source(config::File::from(path).required(false));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let loaded: Self = settings.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// 从指定文件加载，文件必须存在
    pub fn load_required(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        Self::load(Some(path))
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "logging.level 不能为空".to_string(),
            });
        }
        Ok(())
    }
}
