//! 配置冻结、单例预实例化与销毁

use crate::factory::DefaultBeanFactory;
use di_abstractions::{BeanFactory, BeanPostProcessor, LifecycleControl};
use infrastructure_common::{BeanError, BeanInstance, BeanResult, BoxError, ConfigurationState};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 销毁单个实例：先调用销毁感知的后处理器，再调用实例自身的销毁回调
///
/// 所有步骤都会尝试执行，返回第一个错误。
pub(crate) fn destroy_instance(
    name: &str,
    instance: &BeanInstance,
    processors: &[Arc<dyn BeanPostProcessor>],
) -> Result<(), BoxError> {
    let mut first_error = None;

    for processor in processors {
        let Some(aware) = processor.as_destruction_aware() else {
            continue;
        };
        if !aware.requires_destruction(instance) {
            continue;
        }
        if let Err(err) = aware.post_process_before_destruction(instance, name) {
            warn!("Bean '{}' 的销毁前回调失败: {}", name, err);
            first_error.get_or_insert(err);
        }
    }

    if let Some(disposable) = instance.as_disposable() {
        debug!("调用 Bean '{}' 的销毁回调", name);
        if let Err(err) = disposable.destroy() {
            first_error.get_or_insert(err);
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

impl DefaultBeanFactory {
    /// 当前配置状态
    pub fn configuration_state(&self) -> ConfigurationState {
        if self.frozen.load(Ordering::SeqCst) {
            ConfigurationState::Frozen
        } else {
            ConfigurationState::Open
        }
    }

    /// 销毁单例及依赖于它的 Bean，依赖方先销毁
    ///
    /// 依赖边在访问时被取出，因此环中的 Bean 只会被处理一次。
    fn destroy_singleton_inner(&self, name: &str, failures: &mut Vec<BeanError>) {
        let instance = self.singletons.remove(name);
        self.manual_singleton_names.write().shift_remove(name);

        let dependents = self.dependencies.write().take_dependents(name);
        if !dependents.is_empty() {
            debug!("销毁 '{}' 之前先销毁依赖它的 Bean: {:?}", name, dependents);
        }
        for dependent in dependents {
            self.destroy_singleton_inner(&dependent, failures);
        }

        if let Some(instance) = instance {
            let processors = self.post_processors.read().clone();
            if let Err(source) = destroy_instance(name, &instance, &processors) {
                warn!("销毁单例 '{}' 失败: {}", name, source);
                failures.push(BeanError::destruction(name, source));
            }
        }

        self.dependencies.write().remove_bean(name);
    }
}

impl LifecycleControl for DefaultBeanFactory {
    fn freeze_configuration(&self) {
        if !self.frozen.swap(true, Ordering::SeqCst) {
            info!(
                factory_id = %self.factory_id,
                definitions = self.definitions.count(),
                "冻结 Bean 工厂配置"
            );
        }
    }

    fn is_configuration_frozen(&self) -> bool {
        self.configuration_state().is_frozen()
    }

    fn clear_metadata_cache(&self) {
        self.merged.clear();
        debug!(factory_id = %self.factory_id, "清空合并定义缓存");
    }

    fn pre_instantiate_singletons(&self) -> BeanResult<()> {
        info!(factory_id = %self.factory_id, "开始预实例化单例");
        let snapshot = self.definitions.snapshot();

        for name in snapshot.definitions.keys() {
            let merged = self.merged_local_definition(name)?;
            if merged.is_abstract || !merged.is_singleton() || merged.lazy_init {
                continue;
            }
            if let Err(err) = self.get_bean(name) {
                error!(factory_id = %self.factory_id, "预实例化单例 '{}' 失败: {}", name, err);
                return Err(err);
            }
        }

        for name in self.singletons.names() {
            if !snapshot.definitions.contains_key(&name) {
                continue;
            }
            let Some(instance) = self.singletons.get(&name) else {
                continue;
            };
            if let Some(smart) = instance.as_smart_initializing() {
                debug!("回调 '{}' 的单例预实例化完成通知", name);
                smart
                    .after_singletons_instantiated()
                    .map_err(|source| BeanError::creation(name.as_str(), source))?;
            }
        }

        info!(
            factory_id = %self.factory_id,
            singletons = self.singletons.count(),
            "单例预实例化完成"
        );
        Ok(())
    }

    fn destroy_singleton(&self, name: &str) -> Result<(), Vec<BeanError>> {
        let mut failures = Vec::new();
        self.destroy_singleton_inner(name, &mut failures);
        if failures.is_empty() {
            Ok(())
        } else {
            Err(failures)
        }
    }

    fn destroy_singletons(&self) -> Result<(), Vec<BeanError>> {
        let _lock = self.singletons.creation_lock();
        self.singletons.set_in_destruction(true);
        info!(factory_id = %self.factory_id, "开始销毁单例");

        // 依赖关系不足以确定顺序时（包括环），按注册顺序的逆序处理
        let mut failures = Vec::new();
        for name in self.singletons.names().into_iter().rev() {
            self.destroy_singleton_inner(&name, &mut failures);
        }

        self.singletons.clear();
        self.manual_singleton_names.write().clear();
        self.dependencies.write().clear();
        self.singletons.set_in_destruction(false);

        if failures.is_empty() {
            info!(factory_id = %self.factory_id, "单例销毁完成");
            Ok(())
        } else {
            warn!(
                factory_id = %self.factory_id,
                failures = failures.len(),
                "单例销毁完成，部分 Bean 销毁失败"
            );
            Err(failures)
        }
    }

    fn destroy_bean(&self, name: &str, instance: BeanInstance) -> BeanResult<()> {
        let processors = self.post_processors.read().clone();
        destroy_instance(name, &instance, &processors)
            .map_err(|source| BeanError::destruction(name, source))
    }

    fn destroy_scoped_bean(&self, name: &str) -> BeanResult<()> {
        let bean_name = self.aliases.canonical_name(name);
        let merged = self.merged_local_definition(&bean_name)?;
        if merged.is_singleton() || merged.is_prototype() {
            return Err(BeanError::illegal_argument(format!(
                "Bean '{}' 的作用域为 '{}'，不是自定义作用域",
                bean_name, merged.scope
            )));
        }

        let scope = self.scopes.read().get(&merged.scope).cloned().ok_or_else(|| {
            BeanError::illegal_state(format!("作用域 '{}' 没有注册", merged.scope))
        })?;

        match scope.remove(&bean_name) {
            Some(instance) => self.destroy_bean(&bean_name, instance),
            None => Ok(()),
        }
    }
}
