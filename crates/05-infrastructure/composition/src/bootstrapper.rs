//! Bean 工厂启动器
//!
//! 负责协调启动顺序：加载配置、初始化日志、创建工厂、链接父工厂、安装协作方、
//! 应用定义来源、冻结配置、预实例化单例。任何一步失败都会中止启动。

use crate::builder::{init_logging, FactoryBootstrapper};
use di_abstractions::{ConfigurableFactory, LifecycleControl};
use di_impl::DefaultBeanFactory;
use infrastructure_common::{ApplicationSettings, InfrastructureError, InfrastructureResult};
use std::sync::Arc;
use tracing::{error, info, warn};

/// 启动完成的 Bean 工厂
#[derive(Debug)]
pub struct BootstrappedFactory {
    factory: Arc<DefaultBeanFactory>,
    settings: ApplicationSettings,
}

impl BootstrappedFactory {
    /// 工厂
    pub fn factory(&self) -> &Arc<DefaultBeanFactory> {
        &self.factory
    }

    /// 启动时使用的配置
    pub fn settings(&self) -> &ApplicationSettings {
        &self.settings
    }

    /// 关闭工厂，按反向依赖顺序销毁所有单例
    ///
    /// 所有单例都会尝试销毁，失败只记录日志并在最后汇总返回。
    pub fn shutdown(&self) -> InfrastructureResult<()> {
        let factory_id = self.factory.factory_id();
        info!(%factory_id, "开始关闭 Bean 工厂");

        match self.factory.destroy_singletons() {
            Ok(()) => {
                info!(%factory_id, "Bean 工厂关闭完成");
                Ok(())
            }
            Err(failures) => {
                for failure in &failures {
                    error!(%factory_id, "{}", failure);
                }
                Err(InfrastructureError::ShutdownFailed {
                    failures: failures.len(),
                })
            }
        }
    }
}

/// 按顺序执行启动步骤
pub(crate) fn bootstrap(mut plan: FactoryBootstrapper) -> InfrastructureResult<BootstrappedFactory> {
    // 第一步：配置与日志
    let settings = plan.resolve_settings()?;
    if plan.logging_enabled {
        init_logging(&settings.logging)?;
    }

    // 第二步：创建工厂并链接父工厂
    let factory = Arc::new(DefaultBeanFactory::with_settings(settings.factory.clone()));
    let factory_id = factory.factory_id();
    info!(%factory_id, "开始启动 Bean 工厂");

    if let Some(parent) = plan.parent.take() {
        factory.set_parent_bean_factory(parent)?;
    }

    // 第三步：安装协作方
    match plan.constructor.take() {
        Some(constructor) => factory.set_bean_constructor(constructor),
        None => warn!(%factory_id, "未设置对象构造器，本地定义将无法实例化"),
    }
    for processor in plan.post_processors.drain(..) {
        factory.add_bean_post_processor(processor);
    }
    for (name, scope) in plan.scopes.drain(..) {
        factory.register_scope(&name, scope)?;
    }

    // 第四步：应用定义来源
    for source in &plan.sources {
        let count = source.load_definitions(&*factory).map_err(|e| {
            error!(%factory_id, "定义来源 '{}' 加载失败: {}", source.name(), e);
            e
        })?;
        info!(%factory_id, "定义来源 '{}' 加载了 {} 个定义", source.name(), count);
    }

    // 第五步：冻结并预实例化
    factory.freeze_configuration();
    if plan.pre_instantiate {
        factory.pre_instantiate_singletons()?;
    }

    info!(%factory_id, "Bean 工厂启动完成");
    Ok(BootstrappedFactory { factory, settings })
}
