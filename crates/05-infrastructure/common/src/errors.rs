//! 错误类型定义

use thiserror::Error;

/// 装箱的协作方错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        #[from]
        source: config::ConfigError,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// Bean 工厂错误类型
///
/// 所有注册表、合并、解析和生命周期操作的错误都通过该枚举同步返回，
/// 内部不做任何重试。
#[derive(Error, Debug)]
pub enum BeanError {
    #[error("没有名为 '{name}' 的 Bean 定义")]
    NoSuchDefinition { name: String },

    #[error("Bean 定义存储失败: {name}, 原因: {message}")]
    DefinitionStore { name: String, message: String },

    #[error("非法状态: {message}")]
    IllegalState { message: String },

    #[error("非法参数: {message}")]
    IllegalArgument { message: String },

    #[error("Bean 创建失败: {name}, 原因: {source}")]
    Creation { name: String, source: BoxError },

    #[error("Bean '{name}' 正在创建中: 是否存在无法解析的循环引用?")]
    CurrentlyInCreation { name: String },

    #[error("单例正在销毁，不允许创建 Bean: {name}")]
    CreationNotAllowed { name: String },

    #[error("Bean 销毁失败: {name}, 原因: {source}")]
    Destruction { name: String, source: BoxError },
}

impl BeanError {
    /// 创建定义不存在错误
    pub fn no_such_definition(name: impl Into<String>) -> Self {
        Self::NoSuchDefinition { name: name.into() }
    }

    /// 创建定义存储错误
    pub fn definition_store(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DefinitionStore {
            name: name.into(),
            message: message.into(),
        }
    }

    /// 创建非法状态错误
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState {
            message: message.into(),
        }
    }

    /// 创建非法参数错误
    pub fn illegal_argument(message: impl Into<String>) -> Self {
        Self::IllegalArgument {
            message: message.into(),
        }
    }

    /// 创建 Bean 创建错误
    pub fn creation(name: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Creation {
            name: name.into(),
            source: source.into(),
        }
    }

    /// 创建 Bean 销毁错误
    pub fn destruction(name: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Destruction {
            name: name.into(),
            source: source.into(),
        }
    }

    /// 是否属于 Bean 创建类错误（包括循环引用）
    pub fn is_creation_error(&self) -> bool {
        matches!(self, Self::Creation { .. } | Self::CurrentlyInCreation { .. })
    }
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("Bean 工厂错误: {source}")]
    BeanError {
        #[from]
        source: BeanError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },

    #[error("基础设施关闭失败: {failures} 个 Bean 销毁失败")]
    ShutdownFailed { failures: usize },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type BeanResult<T> = Result<T, BeanError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
