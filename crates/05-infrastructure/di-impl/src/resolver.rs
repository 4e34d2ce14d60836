//! 层级查找与 Bean 创建
//!
//! 查找顺序：规范名称 -> 单例缓存 -> 本地没有定义时委托父工厂 -> 合并定义 -> 按作用域创建。

use crate::factory::DefaultBeanFactory;
use crate::lifecycle::destroy_instance;
use di_abstractions::{
    BeanFactory, ConfigurableFactory, HierarchicalLookup, MergedBeanDefinition,
};
use infrastructure_common::{BeanError, BeanInstance, BeanResult, TypeInfo};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

impl DefaultBeanFactory {
    fn do_get_bean(&self, name: &str) -> BeanResult<BeanInstance> {
        let bean_name = self.aliases.canonical_name(name);

        if let Some(instance) = self.singletons.get(&bean_name) {
            return Ok(instance);
        }
        if self.singletons.is_prototype_currently_in_creation(&bean_name) {
            return Err(BeanError::CurrentlyInCreation { name: bean_name });
        }

        if !self.definitions.contains(&bean_name) {
            return match self.parent.get() {
                Some(parent) => parent.get_bean(&bean_name),
                None => Err(BeanError::no_such_definition(name)),
            };
        }

        let merged = self.merged_local_definition(&bean_name)?;
        if merged.is_abstract {
            return Err(BeanError::creation(
                bean_name,
                "抽象定义只能作为父定义使用，不能实例化",
            ));
        }

        self.initialize_depends_on(&bean_name, &merged)?;

        if merged.is_singleton() {
            self.get_or_create_singleton(&bean_name, &merged)
        } else if merged.is_prototype() {
            let _guard = self.singletons.begin_prototype_creation(&bean_name)?;
            self.create_bean(&bean_name, &merged)
        } else {
            self.get_scoped_bean(&bean_name, &merged)
        }
    }

    /// 先创建 depends-on 声明的 Bean，并记录依赖边
    fn initialize_depends_on(&self, bean_name: &str, merged: &MergedBeanDefinition) -> BeanResult<()> {
        for dependency in &merged.depends_on {
            if self.is_dependent(bean_name, dependency) {
                return Err(BeanError::creation(
                    bean_name,
                    format!("'{}' 与 '{}' 之间存在循环 depends-on 关系", bean_name, dependency),
                ));
            }
            self.register_dependent_bean(dependency, bean_name);
            self.get_bean(dependency)
                .map_err(|source| BeanError::creation(bean_name, source))?;
        }
        Ok(())
    }

    fn get_or_create_singleton(
        &self,
        bean_name: &str,
        merged: &MergedBeanDefinition,
    ) -> BeanResult<BeanInstance> {
        let _lock = self.singletons.creation_lock();
        if let Some(instance) = self.singletons.get(bean_name) {
            return Ok(instance);
        }
        if self.singletons.is_in_destruction() {
            return Err(BeanError::CreationNotAllowed {
                name: bean_name.to_string(),
            });
        }

        let _guard = self.singletons.begin_singleton_creation(bean_name)?;
        let instance = self.create_bean(bean_name, merged)?;
        debug!("缓存单例 '{}'", bean_name);
        Ok(self.singletons.add(bean_name, instance))
    }

    fn get_scoped_bean(
        &self,
        bean_name: &str,
        merged: &MergedBeanDefinition,
    ) -> BeanResult<BeanInstance> {
        let scope = self.get_registered_scope(&merged.scope).ok_or_else(|| {
            BeanError::illegal_state(format!(
                "Bean '{}' 使用的作用域 '{}' 没有注册",
                bean_name, merged.scope
            ))
        })?;

        // 并发未命中时多个线程都会创建，作用域只保存其中一个
        let created: Mutex<Option<BeanInstance>> = Mutex::new(None);
        let instance = scope.get(bean_name, &|| {
            let _guard = self.singletons.begin_prototype_creation(bean_name)?;
            let instance = self.create_bean(bean_name, merged)?;
            *created.lock() = Some(Arc::clone(&instance));
            Ok(instance)
        })?;

        let Some(created) = created.into_inner() else {
            return Ok(instance);
        };
        if !self.requires_destruction(&created) {
            return Ok(instance);
        }

        let processors = self.post_processors.read().clone();
        if Arc::ptr_eq(&created, &instance) {
            let callback_name = bean_name.to_string();
            scope.register_destruction_callback(
                bean_name,
                Box::new(move || destroy_instance(&callback_name, &created, &processors)),
            );
        } else {
            debug!("作用域 '{}' 已保存其他线程创建的 '{}'，销毁本线程的实例", merged.scope, bean_name);
            if let Err(err) = destroy_instance(bean_name, &created, &processors) {
                warn!("作用域 Bean '{}' 的多余实例销毁失败: {}", bean_name, err);
            }
        }
        Ok(instance)
    }

    /// 调用构造器并应用后处理器
    fn create_bean(&self, bean_name: &str, merged: &MergedBeanDefinition) -> BeanResult<BeanInstance> {
        let constructor = self.constructor.read().clone().ok_or_else(|| {
            BeanError::creation(bean_name, "工厂没有配置 BeanConstructor")
        })?;

        debug!("创建 Bean '{}' (scope='{}')", bean_name, merged.scope);
        let mut instance = constructor
            .construct(bean_name, merged, self)
            .map_err(|source| BeanError::creation(bean_name, source))?;

        let processors = self.post_processors.read().clone();
        for processor in &processors {
            instance = processor
                .post_process_before_initialization(instance, bean_name)
                .map_err(|source| BeanError::creation(bean_name, source))?;
        }
        for processor in &processors {
            instance = processor
                .post_process_after_initialization(instance, bean_name)
                .map_err(|source| BeanError::creation(bean_name, source))?;
        }
        Ok(instance)
    }

    /// 实例销毁时是否需要回调
    pub(crate) fn requires_destruction(&self, instance: &BeanInstance) -> bool {
        instance.as_disposable().is_some()
            || self.post_processors.read().iter().any(|processor| {
                processor
                    .as_destruction_aware()
                    .is_some_and(|aware| aware.requires_destruction(instance))
            })
    }
}

impl BeanFactory for DefaultBeanFactory {
    fn get_bean(&self, name: &str) -> BeanResult<BeanInstance> {
        self.do_get_bean(name)
    }

    fn contains_bean(&self, name: &str) -> bool {
        if self.contains_local_bean(name) {
            return true;
        }
        let bean_name = self.aliases.canonical_name(name);
        self.parent
            .get()
            .is_some_and(|parent| parent.contains_bean(&bean_name))
    }

    fn is_singleton(&self, name: &str) -> BeanResult<bool> {
        let bean_name = self.aliases.canonical_name(name);
        if self.singletons.contains(&bean_name) {
            return Ok(true);
        }
        if self.definitions.contains(&bean_name) {
            return Ok(self.merged_local_definition(&bean_name)?.is_singleton());
        }
        match self.parent.get() {
            Some(parent) => parent.is_singleton(&bean_name),
            None => Err(BeanError::no_such_definition(name)),
        }
    }

    fn is_prototype(&self, name: &str) -> BeanResult<bool> {
        let bean_name = self.aliases.canonical_name(name);
        if self.definitions.contains(&bean_name) {
            return Ok(self.merged_local_definition(&bean_name)?.is_prototype());
        }
        if self.singletons.contains(&bean_name) {
            return Ok(false);
        }
        match self.parent.get() {
            Some(parent) => parent.is_prototype(&bean_name),
            None => Err(BeanError::no_such_definition(name)),
        }
    }

    fn get_type(&self, name: &str) -> BeanResult<Option<TypeInfo>> {
        let bean_name = self.aliases.canonical_name(name);
        if let Some(instance) = self.singletons.get(&bean_name) {
            return Ok(Some((*instance).component_type()));
        }
        if self.definitions.contains(&bean_name) {
            return Ok(self.merged_local_definition(&bean_name)?.bean_type.clone());
        }
        match self.parent.get() {
            Some(parent) => parent.get_type(&bean_name),
            None => Err(BeanError::no_such_definition(name)),
        }
    }
}

impl HierarchicalLookup for DefaultBeanFactory {
    fn get_parent_bean_factory(&self) -> Option<Arc<dyn HierarchicalLookup>> {
        self.parent.get().cloned()
    }

    fn contains_local_bean(&self, name: &str) -> bool {
        let bean_name = self.aliases.canonical_name(name);
        self.singletons.contains(&bean_name) || self.definitions.contains(&bean_name)
    }

    fn get_merged_bean_definition(&self, name: &str) -> BeanResult<Arc<MergedBeanDefinition>> {
        let bean_name = self.aliases.canonical_name(name);
        if self.definitions.contains(&bean_name) {
            return self.merged_local_definition(&bean_name);
        }
        match self.parent.get() {
            Some(parent) => parent.get_merged_bean_definition(&bean_name),
            None => Err(BeanError::no_such_definition(name)),
        }
    }
}
