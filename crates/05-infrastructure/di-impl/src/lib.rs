//! # 依赖注入具体实现
//!
//! 提供 Bean 定义注册表、层级 Bean 工厂和生命周期协调的具体实现。
//!
//! ## 组件
//!
//! - [`SimpleAliasRegistry`] - 别名映射与环检测
//! - [`DefaultSingletonRegistry`] - 单例缓存与创建中标记
//! - [`DefinitionStore`] - 写时复制的定义存储
//! - [`MergedDefinitionCache`] - 合并定义缓存
//! - [`DependencyGraph`] - 依赖关系图
//! - [`InMemoryScope`] - 内存自定义作用域
//! - [`DefaultBeanFactory`] - 组合以上组件的默认工厂

mod alias_registry;
mod autowire;
mod definition_registry;
mod dependency_graph;
mod factory;
mod lifecycle;
mod merger;
mod resolver;
mod scopes;
mod singleton_registry;

pub use alias_registry::SimpleAliasRegistry;
pub use autowire::TypeMatchingCandidateResolver;
pub use definition_registry::{DefinitionSnapshot, DefinitionStore};
pub use dependency_graph::DependencyGraph;
pub use factory::DefaultBeanFactory;
pub use merger::MergedDefinitionCache;
pub use scopes::InMemoryScope;
pub use singleton_registry::{CreationGuard, DefaultSingletonRegistry};
