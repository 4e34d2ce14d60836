//! 可配置工厂与生命周期控制抽象接口
//!
//! 具体工厂同时实现 [`DefinitionRegistry`](crate::DefinitionRegistry)、
//! [`HierarchicalLookup`]、[`SingletonCache`](crate::SingletonCache)、
//! [`ConfigurableFactory`] 与 [`LifecycleControl`]，每个 trait 只描述一种能力。

use crate::factory::{AutowireCandidateResolver, BeanPostProcessor, StringValueResolver, TypeResolver};
use crate::resolver::HierarchicalLookup;
use crate::scope::Scope;
use infrastructure_common::{BeanError, BeanInstance, BeanResult, TypeInfo};
use std::sync::Arc;

/// 可配置工厂 trait
pub trait ConfigurableFactory: Send + Sync {
    /// 设置父工厂，只能调用一次
    fn set_parent_bean_factory(&self, parent: Arc<dyn HierarchicalLookup>) -> BeanResult<()>;

    /// 设置类型解析上下文
    fn set_type_resolver(&self, resolver: Option<Arc<dyn TypeResolver>>);

    /// 当前类型解析上下文
    fn type_resolver(&self) -> Option<Arc<dyn TypeResolver>>;

    /// 设置是否缓存合并后的定义
    fn set_cache_bean_metadata(&self, cache_bean_metadata: bool);

    /// 是否缓存合并后的定义
    fn is_cache_bean_metadata(&self) -> bool;

    /// 添加嵌入值解析器
    fn add_embedded_value_resolver(&self, resolver: Arc<dyn StringValueResolver>);

    /// 是否注册了嵌入值解析器
    fn has_embedded_value_resolver(&self) -> bool;

    /// 依次应用所有嵌入值解析器
    fn resolve_embedded_value(&self, value: &str) -> Option<String>;

    /// 添加 Bean 后处理器，已存在的同一处理器会被移到末尾
    fn add_bean_post_processor(&self, processor: Arc<dyn BeanPostProcessor>);

    /// 后处理器数量
    fn get_bean_post_processor_count(&self) -> usize;

    /// 注册自定义作用域，`singleton` 与 `prototype` 不可注册
    fn register_scope(&self, name: &str, scope: Arc<dyn Scope>) -> BeanResult<()>;

    /// 已注册的自定义作用域名称
    fn get_registered_scope_names(&self) -> Vec<String>;

    /// 获取自定义作用域
    fn get_registered_scope(&self, name: &str) -> Option<Arc<dyn Scope>>;

    /// 使用解析器重写所有别名
    fn resolve_aliases(&self, resolver: &dyn StringValueResolver) -> BeanResult<()>;

    /// 记录 `dependent_bean_name` 依赖于 `bean_name`
    fn register_dependent_bean(&self, bean_name: &str, dependent_bean_name: &str);

    /// 依赖于指定 Bean 的 Bean 名称
    fn get_dependent_beans(&self, bean_name: &str) -> Vec<String>;

    /// 指定 Bean 依赖的 Bean 名称
    fn get_dependencies_for_bean(&self, bean_name: &str) -> Vec<String>;

    /// `dependent_bean_name` 是否（传递地）依赖于 `bean_name`
    fn is_dependent(&self, bean_name: &str, dependent_bean_name: &str) -> bool;

    /// 忽略自动装配的依赖类型
    fn ignore_dependency_type(&self, dependency_type: TypeInfo);

    /// 依赖类型是否被忽略
    fn is_dependency_type_ignored(&self, dependency_type: &TypeInfo) -> bool;

    /// 注册可解析依赖
    fn register_resolvable_dependency(&self, dependency_type: TypeInfo, value: BeanInstance);

    /// 获取可解析依赖
    fn resolvable_dependency(&self, dependency_type: &TypeInfo) -> Option<BeanInstance>;

    /// 设置自动装配候选判断
    fn set_autowire_candidate_resolver(&self, resolver: Arc<dyn AutowireCandidateResolver>);

    /// 指定 Bean 是否可以作为所需类型的自动装配候选者
    fn is_autowire_candidate(&self, name: &str, required: &TypeInfo) -> BeanResult<bool>;
}

/// 生命周期控制 trait
///
/// 配置状态机：`OPEN` -> `FROZEN`。
pub trait LifecycleControl: Send + Sync {
    /// 冻结配置，重复调用无副作用
    fn freeze_configuration(&self);

    /// 配置是否已冻结
    fn is_configuration_frozen(&self) -> bool;

    /// 清空合并定义缓存，不影响原始定义与已创建的单例
    fn clear_metadata_cache(&self);

    /// 按注册顺序预实例化所有非抽象、非延迟的单例，遇到第一个失败立即返回
    fn pre_instantiate_singletons(&self) -> BeanResult<()>;

    /// 销毁单个缓存的单例（依赖它的 Bean 先销毁）
    fn destroy_singleton(&self, name: &str) -> Result<(), Vec<BeanError>>;

    /// 按反向依赖顺序销毁所有单例，收集而不中断于单个失败
    fn destroy_singletons(&self) -> Result<(), Vec<BeanError>>;

    /// 销毁给定实例（通常为原型）
    fn destroy_bean(&self, name: &str, instance: BeanInstance) -> BeanResult<()>;

    /// 从自定义作用域中移除并销毁实例
    fn destroy_scoped_bean(&self, name: &str) -> BeanResult<()>;
}
