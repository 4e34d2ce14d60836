//! 默认 Bean 工厂
//!
//! [`DefaultBeanFactory`] 组合别名注册表、定义存储、合并缓存、单例注册表与依赖关系图，
//! 实现全部能力 trait。查找与创建见 `resolver` 模块，冻结、预实例化与销毁见 `lifecycle` 模块。

use crate::alias_registry::SimpleAliasRegistry;
use crate::autowire::TypeMatchingCandidateResolver;
use crate::definition_registry::DefinitionStore;
use crate::dependency_graph::DependencyGraph;
use crate::merger::MergedDefinitionCache;
use crate::singleton_registry::DefaultSingletonRegistry;
use di_abstractions::{
    AliasRegistry, AutowireCandidateResolver, BeanConstructor, BeanDefinition, BeanPostProcessor,
    ConfigurableFactory, DefinitionRegistry, HierarchicalLookup, LifecycleControl, Scope,
    SingletonCache, StringValueResolver, TypeResolver, SCOPE_PROTOTYPE, SCOPE_SINGLETON,
};
use indexmap::{IndexMap, IndexSet};
use infrastructure_common::{BeanError, BeanInstance, BeanResult, FactorySettings, TypeInfo};
use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 默认 Bean 工厂
pub struct DefaultBeanFactory {
    pub(crate) factory_id: Uuid,
    pub(crate) settings: RwLock<FactorySettings>,
    pub(crate) frozen: AtomicBool,
    pub(crate) definitions: DefinitionStore,
    pub(crate) merged: MergedDefinitionCache,
    pub(crate) aliases: SimpleAliasRegistry,
    /// 定义名称与别名的交叉检查和写入在此锁内完成
    registration_lock: Mutex<()>,
    pub(crate) singletons: DefaultSingletonRegistry,
    pub(crate) manual_singleton_names: RwLock<IndexSet<String>>,
    pub(crate) dependencies: RwLock<DependencyGraph>,
    pub(crate) parent: OnceCell<Arc<dyn HierarchicalLookup>>,
    pub(crate) scopes: RwLock<IndexMap<String, Arc<dyn Scope>>>,
    pub(crate) post_processors: RwLock<Vec<Arc<dyn BeanPostProcessor>>>,
    value_resolvers: RwLock<Vec<Arc<dyn StringValueResolver>>>,
    type_resolver: RwLock<Option<Arc<dyn TypeResolver>>>,
    pub(crate) constructor: RwLock<Option<Arc<dyn BeanConstructor>>>,
    candidate_resolver: RwLock<Arc<dyn AutowireCandidateResolver>>,
    ignored_dependency_types: RwLock<IndexSet<TypeInfo>>,
    resolvable_dependencies: RwLock<IndexMap<TypeInfo, BeanInstance>>,
}

impl DefaultBeanFactory {
    /// 使用默认配置创建工厂
    pub fn new() -> Self {
        Self::with_settings(FactorySettings::default())
    }

    /// 使用指定配置创建工厂
    pub fn with_settings(settings: FactorySettings) -> Self {
        let factory_id = Uuid::new_v4();
        debug!(%factory_id, "创建 Bean 工厂");
        Self {
            factory_id,
            settings: RwLock::new(settings),
            frozen: AtomicBool::new(false),
            definitions: DefinitionStore::new(),
            merged: MergedDefinitionCache::new(),
            aliases: SimpleAliasRegistry::new(),
            registration_lock: Mutex::new(()),
            singletons: DefaultSingletonRegistry::new(),
            manual_singleton_names: RwLock::new(IndexSet::new()),
            dependencies: RwLock::new(DependencyGraph::new()),
            parent: OnceCell::new(),
            scopes: RwLock::new(IndexMap::new()),
            post_processors: RwLock::new(Vec::new()),
            value_resolvers: RwLock::new(Vec::new()),
            type_resolver: RwLock::new(None),
            constructor: RwLock::new(None),
            candidate_resolver: RwLock::new(Arc::new(TypeMatchingCandidateResolver)),
            ignored_dependency_types: RwLock::new(IndexSet::new()),
            resolvable_dependencies: RwLock::new(IndexMap::new()),
        }
    }

    /// 工厂标识，用于区分层级中的各个工厂
    pub fn factory_id(&self) -> Uuid {
        self.factory_id
    }

    /// 当前配置的拷贝
    pub fn settings(&self) -> FactorySettings {
        self.settings.read().clone()
    }

    /// 设置对象构造器
    pub fn set_bean_constructor(&self, constructor: Arc<dyn BeanConstructor>) {
        *self.constructor.write() = Some(constructor);
    }

    /// 设置是否允许同名定义覆盖
    pub fn set_allow_bean_definition_overriding(&self, allow: bool) {
        self.settings.write().allow_bean_definition_overriding = allow;
    }

    /// 设置是否允许别名重新指向
    pub fn set_allow_alias_overriding(&self, allow: bool) {
        self.settings.write().allow_alias_overriding = allow;
    }

    /// 从另一个工厂复制配置
    ///
    /// 复制作用域、后处理器、嵌入值解析器、忽略的依赖类型、类型解析上下文、
    /// 自动装配候选判断与元数据配置。不复制定义、单例和父工厂。
    pub fn copy_configuration_from(&self, other: &DefaultBeanFactory) {
        if std::ptr::eq(self, other) {
            return;
        }
        *self.settings.write() = other.settings();
        *self.type_resolver.write() = other.type_resolver();
        *self.candidate_resolver.write() = other.candidate_resolver.read().clone();

        for (name, scope) in other.scopes.read().iter() {
            self.scopes.write().insert(name.clone(), Arc::clone(scope));
        }
        for processor in other.post_processors.read().iter() {
            self.add_bean_post_processor(Arc::clone(processor));
        }
        self.value_resolvers
            .write()
            .extend(other.value_resolvers.read().iter().cloned());
        self.ignored_dependency_types
            .write()
            .extend(other.ignored_dependency_types.read().iter().cloned());

        debug!(
            factory_id = %self.factory_id,
            source = %other.factory_id,
            "复制工厂配置"
        );
    }

    /// 所有 Bean 名称：先是定义名称，然后是手动注册的单例名称
    pub fn get_bean_names(&self) -> Vec<String> {
        let mut names = self.definitions.names();
        for name in self.manual_singleton_names.read().iter() {
            if !self.definitions.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }

    /// 冻结后按配置拒绝变更
    pub(crate) fn ensure_mutable(&self, name: &str) -> BeanResult<()> {
        if self.is_configuration_frozen() && self.settings.read().reject_mutation_after_freeze {
            return Err(BeanError::illegal_state(format!(
                "工厂配置已冻结，不能修改 Bean 定义 '{}'",
                name
            )));
        }
        Ok(())
    }

    /// 重置定义：清除合并缓存、销毁同名单例，并递归重置以其为父定义的子定义
    ///
    /// `destroy_singleton` 为 false 时只清除缓存，子定义总是完整重置。
    pub(crate) fn reset_bean_definition(&self, name: &str, destroy_singleton: bool) {
        let mut visited = IndexSet::new();
        self.reset_bean_definition_inner(name, destroy_singleton, &mut visited);
    }

    fn reset_bean_definition_inner(
        &self,
        name: &str,
        destroy_singleton: bool,
        visited: &mut IndexSet<String>,
    ) {
        if !visited.insert(name.to_string()) {
            return;
        }

        self.merged.evict(name);
        if destroy_singleton {
            if let Err(failures) = self.destroy_singleton(name) {
                for failure in failures {
                    warn!("重置 Bean 定义 '{}' 时销毁单例失败: {}", name, failure);
                }
            }
        }

        let snapshot = self.definitions.snapshot();
        for (child_name, definition) in &snapshot.definitions {
            if child_name == name {
                continue;
            }
            let is_child = definition
                .parent_name
                .as_deref()
                .is_some_and(|parent| self.aliases.canonical_name(parent) == name);
            if is_child {
                self.reset_bean_definition_inner(child_name, true, visited);
            }
        }
    }

    fn log_override(name: &str, existing: &BeanDefinition, replacement: &BeanDefinition) {
        if existing == replacement {
            debug!("以相同的定义覆盖 Bean '{}'", name);
        } else if existing.effective_role() < replacement.effective_role() {
            warn!(
                "覆盖 Bean 定义 '{}': 角色由 {:?} 变为 {:?}",
                name,
                existing.effective_role(),
                replacement.effective_role()
            );
        } else {
            info!("覆盖 Bean 定义 '{}'", name);
        }
    }
}

impl Default for DefaultBeanFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DefaultBeanFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultBeanFactory")
            .field("factory_id", &self.factory_id)
            .field("definitions", &self.definitions.names())
            .field("singletons", &self.singletons.names())
            .field("frozen", &self.is_configuration_frozen())
            .field("has_parent", &self.parent.get().is_some())
            .finish()
    }
}

fn validate_definition(name: &str, definition: &BeanDefinition) -> BeanResult<()> {
    if name.trim().is_empty() {
        return Err(BeanError::definition_store(name, "Bean 名称不能为空"));
    }
    if let Some(scope) = &definition.scope {
        if !scope.is_empty() && scope.trim().is_empty() {
            return Err(BeanError::definition_store(name, "作用域不能为空白字符串"));
        }
    }
    if definition
        .parent_name
        .as_deref()
        .is_some_and(|parent| parent.trim().is_empty())
    {
        return Err(BeanError::definition_store(name, "父定义名称不能为空"));
    }
    if definition
        .depends_on
        .iter()
        .flatten()
        .any(|dependency| dependency.trim().is_empty())
    {
        return Err(BeanError::definition_store(name, "depends-on 中包含空的 Bean 名称"));
    }
    Ok(())
}

impl AliasRegistry for DefaultBeanFactory {
    fn register_alias(&self, name: &str, alias: &str) -> BeanResult<()> {
        let _registration = self.registration_lock.lock();
        if alias != name && self.definitions.contains(alias) {
            return Err(BeanError::definition_store(
                alias,
                format!("无法为 '{}' 注册别名 '{}': 该名称已是 Bean 定义名称", name, alias),
            ));
        }
        let allow_overriding = self.settings.read().allow_alias_overriding;
        self.aliases.register_alias(name, alias, allow_overriding)
    }

    fn remove_alias(&self, alias: &str) -> BeanResult<()> {
        self.aliases.remove_alias(alias)
    }

    fn is_alias(&self, name: &str) -> bool {
        self.aliases.is_alias(name)
    }

    fn get_aliases(&self, name: &str) -> Vec<String> {
        self.aliases.get_aliases(&self.aliases.canonical_name(name))
    }

    fn canonical_name(&self, name: &str) -> String {
        self.aliases.canonical_name(name)
    }
}

impl DefinitionRegistry for DefaultBeanFactory {
    fn register_bean_definition(&self, name: &str, definition: BeanDefinition) -> BeanResult<()> {
        validate_definition(name, &definition)?;
        self.ensure_mutable(name)?;

        let definition = Arc::new(definition);
        let previous = {
            let _registration = self.registration_lock.lock();
            if self.aliases.is_alias(name) {
                return Err(BeanError::definition_store(
                    name,
                    format!(
                        "该名称已注册为 '{}' 的别名",
                        self.aliases.canonical_name(name)
                    ),
                ));
            }
            let allow_overriding = self.settings.read().allow_bean_definition_overriding;
            self.definitions
                .insert(name, Arc::clone(&definition), allow_overriding)?
        };

        match &previous {
            Some(existing) => Self::log_override(name, existing, &definition),
            None => info!("注册 Bean 定义 '{}'", name),
        }
        let replaces_instance = previous.is_some() || self.singletons.contains(name);
        self.reset_bean_definition(name, replaces_instance);
        Ok(())
    }

    fn remove_bean_definition(&self, name: &str) -> BeanResult<()> {
        self.ensure_mutable(name)?;
        if self.definitions.remove(name).is_none() {
            return Err(BeanError::no_such_definition(name));
        }

        info!("移除 Bean 定义 '{}'", name);
        self.reset_bean_definition(name, true);
        self.dependencies.write().remove_bean(name);
        Ok(())
    }

    fn get_bean_definition(&self, name: &str) -> BeanResult<Arc<BeanDefinition>> {
        self.definitions
            .get(name)
            .ok_or_else(|| BeanError::no_such_definition(name))
    }

    fn contains_bean_definition(&self, name: &str) -> bool {
        self.definitions.contains(name)
    }

    fn get_bean_definition_names(&self) -> Vec<String> {
        self.definitions.names()
    }

    fn get_bean_definition_count(&self) -> usize {
        self.definitions.count()
    }

    fn is_bean_name_in_use(&self, name: &str) -> bool {
        self.aliases.is_alias(name)
            || self.definitions.contains(name)
            || self.singletons.contains(name)
            || self.dependencies.read().has_dependents(name)
    }
}

impl SingletonCache for DefaultBeanFactory {
    fn register_singleton(&self, name: &str, instance: BeanInstance) -> BeanResult<()> {
        if name.trim().is_empty() {
            return Err(BeanError::illegal_argument("单例名称不能为空"));
        }
        self.singletons.register(name, instance)?;
        if !self.definitions.contains(name) {
            self.manual_singleton_names.write().insert(name.to_string());
        }
        info!("手动注册单例 '{}'", name);
        Ok(())
    }

    fn get_singleton(&self, name: &str) -> Option<BeanInstance> {
        self.singletons.get(name)
    }

    fn contains_singleton(&self, name: &str) -> bool {
        self.singletons.contains(name)
    }

    fn get_singleton_names(&self) -> Vec<String> {
        self.singletons.names()
    }

    fn get_singleton_count(&self) -> usize {
        self.singletons.count()
    }

    fn set_currently_in_creation(&self, name: &str, in_creation: bool) {
        let bean_name = self.aliases.canonical_name(name);
        self.singletons.set_currently_in_creation(&bean_name, in_creation);
    }

    fn is_currently_in_creation(&self, name: &str) -> bool {
        let bean_name = self.aliases.canonical_name(name);
        self.singletons.is_currently_in_creation(&bean_name)
            || self.singletons.is_prototype_currently_in_creation(&bean_name)
    }
}

impl ConfigurableFactory for DefaultBeanFactory {
    fn set_parent_bean_factory(&self, parent: Arc<dyn HierarchicalLookup>) -> BeanResult<()> {
        let this = (self as *const Self).cast::<()>();
        let mut ancestor = Some(Arc::clone(&parent));
        while let Some(current) = ancestor {
            if Arc::as_ptr(&current).cast::<()>() == this {
                return Err(BeanError::illegal_state(
                    "不能把工厂自身或其后代设置为父工厂",
                ));
            }
            ancestor = current.get_parent_bean_factory();
        }

        self.parent.set(parent).map_err(|_| {
            BeanError::illegal_state("父工厂已经设置，不能再次设置")
        })?;
        info!(factory_id = %self.factory_id, "设置父工厂");
        Ok(())
    }

    fn set_type_resolver(&self, resolver: Option<Arc<dyn TypeResolver>>) {
        *self.type_resolver.write() = resolver;
    }

    fn type_resolver(&self) -> Option<Arc<dyn TypeResolver>> {
        self.type_resolver.read().clone()
    }

    fn set_cache_bean_metadata(&self, cache_bean_metadata: bool) {
        self.settings.write().cache_bean_metadata = cache_bean_metadata;
        if !cache_bean_metadata {
            self.merged.clear();
        }
    }

    fn is_cache_bean_metadata(&self) -> bool {
        self.settings.read().cache_bean_metadata
    }

    fn add_embedded_value_resolver(&self, resolver: Arc<dyn StringValueResolver>) {
        self.value_resolvers.write().push(resolver);
    }

    fn has_embedded_value_resolver(&self) -> bool {
        !self.value_resolvers.read().is_empty()
    }

    fn resolve_embedded_value(&self, value: &str) -> Option<String> {
        let resolvers = self.value_resolvers.read().clone();
        let mut result = value.to_string();
        for resolver in &resolvers {
            result = resolver.resolve_string_value(&result)?;
        }
        Some(result)
    }

    fn add_bean_post_processor(&self, processor: Arc<dyn BeanPostProcessor>) {
        let mut processors = self.post_processors.write();
        processors.retain(|existing| !Arc::ptr_eq(existing, &processor));
        processors.push(processor);
    }

    fn get_bean_post_processor_count(&self) -> usize {
        self.post_processors.read().len()
    }

    fn register_scope(&self, name: &str, scope: Arc<dyn Scope>) -> BeanResult<()> {
        if name.trim().is_empty() {
            return Err(BeanError::illegal_argument("作用域名称不能为空"));
        }
        if name == SCOPE_SINGLETON || name == SCOPE_PROTOTYPE {
            return Err(BeanError::illegal_argument(format!(
                "不能替换内置作用域 '{}'",
                name
            )));
        }

        if let Some(previous) = self.scopes.write().insert(name.to_string(), scope) {
            debug!("替换作用域 '{}' 的实现 {:?}", name, previous);
        } else {
            info!("注册作用域 '{}'", name);
        }
        Ok(())
    }

    fn get_registered_scope_names(&self) -> Vec<String> {
        self.scopes.read().keys().cloned().collect()
    }

    fn get_registered_scope(&self, name: &str) -> Option<Arc<dyn Scope>> {
        self.scopes.read().get(name).cloned()
    }

    fn resolve_aliases(&self, resolver: &dyn StringValueResolver) -> BeanResult<()> {
        self.aliases.resolve_aliases(resolver)?;
        for (alias, name) in self.aliases.entries() {
            if self.definitions.contains(&alias) {
                warn!("解析后的别名 '{}' -> '{}' 与 Bean 定义名称相同", alias, name);
            }
        }
        Ok(())
    }

    fn register_dependent_bean(&self, bean_name: &str, dependent_bean_name: &str) {
        let bean_name = self.aliases.canonical_name(bean_name);
        if self
            .dependencies
            .write()
            .register(&bean_name, dependent_bean_name)
        {
            debug!("记录依赖关系: '{}' 依赖于 '{}'", dependent_bean_name, bean_name);
        }
    }

    fn get_dependent_beans(&self, bean_name: &str) -> Vec<String> {
        self.dependencies.read().dependents_of(bean_name)
    }

    fn get_dependencies_for_bean(&self, bean_name: &str) -> Vec<String> {
        self.dependencies.read().dependencies_of(bean_name)
    }

    fn is_dependent(&self, bean_name: &str, dependent_bean_name: &str) -> bool {
        let bean_name = self.aliases.canonical_name(bean_name);
        self.dependencies
            .read()
            .is_dependent(&bean_name, dependent_bean_name)
    }

    fn ignore_dependency_type(&self, dependency_type: TypeInfo) {
        self.ignored_dependency_types.write().insert(dependency_type);
    }

    fn is_dependency_type_ignored(&self, dependency_type: &TypeInfo) -> bool {
        self.ignored_dependency_types
            .read()
            .iter()
            .any(|ignored| ignored.matches(dependency_type))
    }

    fn register_resolvable_dependency(&self, dependency_type: TypeInfo, value: BeanInstance) {
        debug!("注册可解析依赖 {}", dependency_type);
        self.resolvable_dependencies
            .write()
            .insert(dependency_type, value);
    }

    fn resolvable_dependency(&self, dependency_type: &TypeInfo) -> Option<BeanInstance> {
        self.resolvable_dependencies
            .read()
            .iter()
            .find(|(registered, _)| registered.matches(dependency_type))
            .map(|(_, value)| value.clone())
    }

    fn set_autowire_candidate_resolver(&self, resolver: Arc<dyn AutowireCandidateResolver>) {
        *self.candidate_resolver.write() = resolver;
    }

    fn is_autowire_candidate(&self, name: &str, required: &TypeInfo) -> BeanResult<bool> {
        let bean_name = self.aliases.canonical_name(name);
        let resolver = self.candidate_resolver.read().clone();

        if self.definitions.contains(&bean_name) {
            let merged = self.merged_local_definition(&bean_name)?;
            return Ok(resolver.is_autowire_candidate(&merged, required));
        }
        if let Some(instance) = self.singletons.get(&bean_name) {
            return Ok((*instance).component_type().matches(required));
        }
        match self.parent.get() {
            Some(parent) => {
                let merged = parent.get_merged_bean_definition(&bean_name)?;
                Ok(resolver.is_autowire_candidate(&merged, required))
            }
            None => Err(BeanError::no_such_definition(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scopes::InMemoryScope;
    use di_abstractions::BeanRole;
    use infrastructure_common::ManagedComponent;

    #[derive(Debug)]
    struct Clock;

    impl ManagedComponent for Clock {}

    #[test]
    fn test_definition_round_trip() {
        let factory = DefaultBeanFactory::new();
        let definition = BeanDefinition::of_type(TypeInfo::from_name("UserService"))
            .with_description("用户服务");
        factory
            .register_bean_definition("userService", definition.clone())
            .unwrap();

        assert_eq!(*factory.get_bean_definition("userService").unwrap(), definition);
        assert!(factory.contains_bean_definition("userService"));
        assert_eq!(factory.get_bean_definition_count(), 1);
    }

    #[test]
    fn test_names_are_insertion_ordered() {
        let factory = DefaultBeanFactory::new();
        for name in ["zeta", "alpha", "mid"] {
            factory.register_bean_definition(name, BeanDefinition::new()).unwrap();
        }
        assert_eq!(factory.get_bean_definition_names(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_remove_missing_leaves_registry_unchanged() {
        let factory = DefaultBeanFactory::new();
        factory.register_bean_definition("a", BeanDefinition::new()).unwrap();

        let result = factory.remove_bean_definition("missing");
        assert!(matches!(result, Err(BeanError::NoSuchDefinition { .. })));
        assert_eq!(factory.get_bean_definition_names(), vec!["a"]);
    }

    #[test]
    fn test_definition_name_taken_by_alias() {
        let factory = DefaultBeanFactory::new();
        factory.register_bean_definition("dataSource", BeanDefinition::new()).unwrap();
        factory.register_alias("dataSource", "ds").unwrap();

        let result = factory.register_bean_definition("ds", BeanDefinition::new());
        assert!(matches!(result, Err(BeanError::DefinitionStore { .. })));
        assert!(!factory.contains_bean_definition("ds"));
    }

    #[test]
    fn test_alias_cannot_shadow_definition() {
        let factory = DefaultBeanFactory::new();
        factory.register_bean_definition("a", BeanDefinition::new()).unwrap();
        factory.register_bean_definition("b", BeanDefinition::new()).unwrap();

        let result = factory.register_alias("a", "b");
        assert!(matches!(result, Err(BeanError::DefinitionStore { .. })));
        assert!(!factory.is_alias("b"));
    }

    #[test]
    fn test_concurrent_alias_and_definition_never_share_a_name() {
        for round in 0..200 {
            let factory = DefaultBeanFactory::new();
            factory.register_bean_definition("x", BeanDefinition::new()).unwrap();
            let barrier = std::sync::Barrier::new(2);
            let name = format!("b{round}");

            let (alias_result, definition_result) = std::thread::scope(|s| {
                let alias = s.spawn(|| {
                    barrier.wait();
                    factory.register_alias("x", &name)
                });
                let definition = s.spawn(|| {
                    barrier.wait();
                    factory.register_bean_definition(&name, BeanDefinition::new())
                });
                (alias.join().unwrap(), definition.join().unwrap())
            });

            assert!(alias_result.is_ok() != definition_result.is_ok());
            assert!(factory.is_alias(&name) != factory.contains_bean_definition(&name));
        }
    }

    #[test]
    fn test_override_disallowed() {
        let factory = DefaultBeanFactory::new();
        factory.set_allow_bean_definition_overriding(false);
        factory.register_bean_definition("a", BeanDefinition::new()).unwrap();

        let result = factory.register_bean_definition(
            "a",
            BeanDefinition::new().with_role(BeanRole::Infrastructure),
        );
        assert!(matches!(result, Err(BeanError::DefinitionStore { .. })));
        assert_eq!(factory.get_bean_definition("a").unwrap().role, None);
    }

    #[test]
    fn test_malformed_definitions_rejected() {
        let factory = DefaultBeanFactory::new();
        let cases = [
            ("  ", BeanDefinition::new()),
            ("a", BeanDefinition::new().with_scope("   ")),
            ("b", BeanDefinition::child_of("")),
            ("c", BeanDefinition::new().with_depends_on(["x", " "])),
        ];
        for (name, definition) in cases {
            let result = factory.register_bean_definition(name, definition);
            assert!(matches!(result, Err(BeanError::DefinitionStore { .. })), "{name:?}");
        }
        assert_eq!(factory.get_bean_definition_count(), 0);
    }

    #[test]
    fn test_bean_name_in_use() {
        let factory = DefaultBeanFactory::new();
        factory.register_bean_definition("repo", BeanDefinition::new()).unwrap();
        factory.register_alias("repo", "repository").unwrap();
        factory.register_singleton("clock", Arc::new(Clock)).unwrap();

        assert!(factory.is_bean_name_in_use("repo"));
        assert!(factory.is_bean_name_in_use("repository"));
        assert!(factory.is_bean_name_in_use("clock"));
        assert!(!factory.is_bean_name_in_use("unused"));
        assert_eq!(factory.get_bean_names(), vec!["repo", "clock"]);
    }

    #[test]
    fn test_definition_replaces_manual_singleton() {
        let factory = DefaultBeanFactory::new();
        factory.register_singleton("clock", Arc::new(Clock)).unwrap();

        factory.register_bean_definition("clock", BeanDefinition::new()).unwrap();
        assert!(!factory.contains_singleton("clock"));
        assert_eq!(factory.get_bean_names(), vec!["clock"]);
    }

    #[test]
    fn test_reserved_scope_names() {
        let factory = DefaultBeanFactory::new();
        for reserved in [SCOPE_SINGLETON, SCOPE_PROTOTYPE] {
            let result = factory.register_scope(reserved, Arc::new(InMemoryScope::new(reserved)));
            assert!(matches!(result, Err(BeanError::IllegalArgument { .. })));
        }

        factory
            .register_scope("request", Arc::new(InMemoryScope::new("request")))
            .unwrap();
        assert_eq!(factory.get_registered_scope_names(), vec!["request"]);
        assert!(factory.get_registered_scope("request").is_some());
        assert!(factory.get_registered_scope("session").is_none());
    }

    #[test]
    fn test_parent_can_only_be_set_once() {
        let root: Arc<dyn HierarchicalLookup> = Arc::new(DefaultBeanFactory::new());
        let child = DefaultBeanFactory::new();

        child.set_parent_bean_factory(Arc::clone(&root)).unwrap();
        let result = child.set_parent_bean_factory(root);
        assert!(matches!(result, Err(BeanError::IllegalState { .. })));
    }

    #[test]
    fn test_parent_chain_cannot_contain_self() {
        let root = Arc::new(DefaultBeanFactory::new());
        let child = Arc::new(DefaultBeanFactory::new());
        child
            .set_parent_bean_factory(Arc::clone(&root) as Arc<dyn HierarchicalLookup>)
            .unwrap();

        let result = root.set_parent_bean_factory(child as Arc<dyn HierarchicalLookup>);
        assert!(matches!(result, Err(BeanError::IllegalState { .. })));
        assert!(root.get_parent_bean_factory().is_none());
    }

    struct Noop;

    impl BeanPostProcessor for Noop {}

    #[test]
    fn test_post_processor_readded_moves_to_end() {
        let factory = DefaultBeanFactory::new();
        let first: Arc<dyn BeanPostProcessor> = Arc::new(Noop);
        let second: Arc<dyn BeanPostProcessor> = Arc::new(Noop);
        factory.add_bean_post_processor(Arc::clone(&first));
        factory.add_bean_post_processor(Arc::clone(&second));
        factory.add_bean_post_processor(Arc::clone(&first));

        assert_eq!(factory.get_bean_post_processor_count(), 2);
        assert!(Arc::ptr_eq(&factory.post_processors.read()[1], &first));
    }

    #[test]
    fn test_embedded_value_chain_stops_on_none() {
        let factory = DefaultBeanFactory::new();
        assert!(!factory.has_embedded_value_resolver());
        assert_eq!(factory.resolve_embedded_value("plain").as_deref(), Some("plain"));

        factory.add_embedded_value_resolver(Arc::new(|value: &str| -> Option<String> {
            Some(value.replace("${env}", "prod"))
        }));
        factory.add_embedded_value_resolver(Arc::new(|value: &str| -> Option<String> {
            (!value.contains("drop")).then(|| value.to_uppercase())
        }));

        assert_eq!(factory.resolve_embedded_value("db-${env}").as_deref(), Some("DB-PROD"));
        assert_eq!(factory.resolve_embedded_value("drop-me"), None);
    }

    #[test]
    fn test_dependency_registration_through_alias() {
        let factory = DefaultBeanFactory::new();
        factory.register_bean_definition("dataSource", BeanDefinition::new()).unwrap();
        factory.register_alias("dataSource", "ds").unwrap();

        factory.register_dependent_bean("ds", "repository");
        factory.register_dependent_bean("repository", "service");

        assert_eq!(factory.get_dependent_beans("dataSource"), vec!["repository"]);
        assert_eq!(factory.get_dependencies_for_bean("repository"), vec!["dataSource"]);
        assert!(factory.is_dependent("ds", "service"));
        assert!(factory.is_bean_name_in_use("repository"));
    }

    #[test]
    fn test_resolvable_and_ignored_dependencies() {
        let factory = DefaultBeanFactory::new();
        factory.register_resolvable_dependency(TypeInfo::of::<Clock>(), Arc::new(Clock));
        factory.ignore_dependency_type(TypeInfo::from_name("Environment"));

        assert!(factory.resolvable_dependency(&TypeInfo::of::<Clock>()).is_some());
        assert!(factory.resolvable_dependency(&TypeInfo::of::<String>()).is_none());
        assert!(factory.is_dependency_type_ignored(&TypeInfo::from_name("Environment")));
        assert!(!factory.is_dependency_type_ignored(&TypeInfo::of::<Clock>()));
    }

    #[test]
    fn test_autowire_candidate_checks() {
        let factory = DefaultBeanFactory::new();
        factory
            .register_bean_definition("clockDef", BeanDefinition::of_type(TypeInfo::of::<Clock>()))
            .unwrap();
        factory
            .register_bean_definition(
                "hidden",
                BeanDefinition::of_type(TypeInfo::of::<Clock>()).with_autowire_candidate(false),
            )
            .unwrap();
        factory.register_singleton("manualClock", Arc::new(Clock)).unwrap();

        let required = TypeInfo::of::<Clock>();
        assert!(factory.is_autowire_candidate("clockDef", &required).unwrap());
        assert!(!factory.is_autowire_candidate("hidden", &required).unwrap());
        assert!(factory.is_autowire_candidate("manualClock", &required).unwrap());
        assert!(matches!(
            factory.is_autowire_candidate("missing", &required),
            Err(BeanError::NoSuchDefinition { .. })
        ));
    }

    #[test]
    fn test_copy_configuration_from() {
        let source = DefaultBeanFactory::new();
        source
            .register_scope("request", Arc::new(InMemoryScope::new("request")))
            .unwrap();
        source.set_cache_bean_metadata(false);
        source.ignore_dependency_type(TypeInfo::from_name("Environment"));
        source.register_bean_definition("a", BeanDefinition::new()).unwrap();

        let target = DefaultBeanFactory::new();
        target.copy_configuration_from(&source);

        assert_eq!(target.get_registered_scope_names(), vec!["request"]);
        assert!(!target.is_cache_bean_metadata());
        assert!(target.is_dependency_type_ignored(&TypeInfo::from_name("Environment")));
        assert_eq!(target.get_bean_definition_count(), 0);
    }

    #[test]
    fn test_copy_configuration_from_itself_is_noop() {
        let factory = DefaultBeanFactory::new();
        factory
            .register_scope("request", Arc::new(InMemoryScope::new("request")))
            .unwrap();
        factory.add_bean_post_processor(Arc::new(Noop));

        factory.copy_configuration_from(&factory);
        assert_eq!(factory.get_registered_scope_names(), vec!["request"]);
        assert_eq!(factory.get_bean_post_processor_count(), 1);
    }

    #[test]
    fn test_creation_flag_set_through_alias() {
        let factory = DefaultBeanFactory::new();
        factory.register_bean_definition("dataSource", BeanDefinition::new()).unwrap();
        factory.register_alias("dataSource", "ds").unwrap();

        factory.set_currently_in_creation("ds", true);
        assert!(factory.is_currently_in_creation("dataSource"));
        assert!(factory.is_currently_in_creation("ds"));

        factory.set_currently_in_creation("dataSource", false);
        assert!(!factory.is_currently_in_creation("ds"));
    }
}
