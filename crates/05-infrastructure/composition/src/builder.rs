//! Bean 工厂启动构建器

use crate::bootstrapper::{self, BootstrappedFactory};
use crate::source::DefinitionSource;
use di_abstractions::{BeanConstructor, BeanPostProcessor, HierarchicalLookup, Scope};
use infrastructure_common::{
    ApplicationSettings, InfrastructureError, InfrastructureResult, LoggingSettings,
};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Bean 工厂启动构建器
///
/// 使用建造者模式收集启动所需的配置、定义来源与协作方，最后由 [`build`](Self::build)
/// 按固定顺序完成启动。
pub struct FactoryBootstrapper {
    /// 显式给出的配置，优先于配置文件
    pub(crate) settings: Option<ApplicationSettings>,
    /// 配置文件路径
    pub(crate) settings_path: Option<PathBuf>,
    /// 是否初始化日志
    pub(crate) logging_enabled: bool,
    /// 父工厂
    pub(crate) parent: Option<Arc<dyn HierarchicalLookup>>,
    /// 定义来源，按添加顺序应用
    pub(crate) sources: Vec<Box<dyn DefinitionSource>>,
    /// 自定义作用域
    pub(crate) scopes: Vec<(String, Arc<dyn Scope>)>,
    /// 对象构造器
    pub(crate) constructor: Option<Arc<dyn BeanConstructor>>,
    /// 后处理器
    pub(crate) post_processors: Vec<Arc<dyn BeanPostProcessor>>,
    /// 是否预实例化单例
    pub(crate) pre_instantiate: bool,
}

impl FactoryBootstrapper {
    /// 创建新的启动构建器
    pub fn new() -> Self {
        Self {
            settings: None,
            settings_path: None,
            logging_enabled: false, // 默认不初始化日志，由应用入口决定
            parent: None,
            sources: Vec::new(),
            scopes: Vec::new(),
            constructor: None,
            post_processors: Vec::new(),
            pre_instantiate: true,
        }
    }

    /// 使用指定配置，不再从文件和环境变量加载
    pub fn with_settings(mut self, settings: ApplicationSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// 从 TOML 配置文件加载配置，文件不存在时使用默认值
    pub fn with_settings_file(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!("使用工厂配置文件: {}", path.display());
        self.settings_path = Some(path);
        self
    }

    /// 启动时按配置初始化日志
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// 设置父工厂
    pub fn with_parent(mut self, parent: Arc<dyn HierarchicalLookup>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// 添加定义来源
    pub fn add_definition_source<S: DefinitionSource + 'static>(mut self, source: S) -> Self {
        debug!("添加定义来源: {}", source.name());
        self.sources.push(Box::new(source));
        self
    }

    /// 添加自定义作用域
    pub fn add_scope(mut self, name: impl Into<String>, scope: Arc<dyn Scope>) -> Self {
        self.scopes.push((name.into(), scope));
        self
    }

    /// 设置对象构造器
    pub fn with_constructor(mut self, constructor: Arc<dyn BeanConstructor>) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// 添加后处理器
    pub fn add_post_processor(mut self, processor: Arc<dyn BeanPostProcessor>) -> Self {
        self.post_processors.push(processor);
        self
    }

    /// 设置是否在冻结后预实例化单例
    pub fn pre_instantiate(mut self, enabled: bool) -> Self {
        self.pre_instantiate = enabled;
        self
    }

    /// 完成启动
    pub fn build(self) -> InfrastructureResult<BootstrappedFactory> {
        bootstrapper::bootstrap(self)
    }

    /// 解析最终生效的配置
    pub(crate) fn resolve_settings(&mut self) -> InfrastructureResult<ApplicationSettings> {
        if let Some(settings) = self.settings.take() {
            return Ok(settings);
        }
        Ok(ApplicationSettings::load(self.settings_path.as_deref())?)
    }
}

impl Default for FactoryBootstrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FactoryBootstrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryBootstrapper")
            .field("settings_path", &self.settings_path)
            .field("logging_enabled", &self.logging_enabled)
            .field("has_parent", &self.parent.is_some())
            .field(
                "sources",
                &self.sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field(
                "scopes",
                &self.scopes.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .field("post_processors", &self.post_processors.len())
            .field("pre_instantiate", &self.pre_instantiate)
            .finish()
    }
}

/// 初始化日志系统
///
/// `level` 作为 `EnvFilter` 指令解析，例如 `info` 或 `di_impl=debug,info`。
/// 全局订阅者已经存在时返回错误。
pub fn init_logging(settings: &LoggingSettings) -> InfrastructureResult<()> {
    let filter = EnvFilter::try_new(&settings.level).map_err(|e| {
        InfrastructureError::BootstrapFailed {
            message: format!("日志级别无效 '{}': {}", settings.level, e),
        }
    })?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(settings.show_target);

    if settings.json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    }
    .map_err(|e| InfrastructureError::BootstrapFailed {
        message: format!("日志初始化失败: {}", e),
    })?;

    info!("日志系统初始化完成");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DefinitionSet;
    use di_impl::InMemoryScope;

    #[test]
    fn test_explicit_settings_win_over_file() {
        let mut settings = ApplicationSettings::default();
        settings.factory.cache_bean_metadata = false;

        let mut bootstrapper = FactoryBootstrapper::new()
            .with_settings_file("does/not/exist.toml")
            .with_settings(settings.clone());
        assert_eq!(bootstrapper.resolve_settings().unwrap(), settings);
    }

    #[test]
    fn test_missing_settings_file_uses_defaults() {
        let mut bootstrapper =
            FactoryBootstrapper::new().with_settings_file("does/not/exist.toml");
        let settings = bootstrapper.resolve_settings().unwrap();
        assert!(settings.factory.reject_mutation_after_freeze);
    }

    #[test]
    fn test_debug_lists_sources_and_scopes() {
        let bootstrapper = FactoryBootstrapper::new()
            .add_definition_source(DefinitionSet::new("core"))
            .add_scope("session", Arc::new(InMemoryScope::new("session")));
        let rendered = format!("{:?}", bootstrapper);
        assert!(rendered.contains("core"));
        assert!(rendered.contains("session"));
    }
}
