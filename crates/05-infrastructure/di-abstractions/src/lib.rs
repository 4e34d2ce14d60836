//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义 Bean 定义注册、层级解析和生命周期控制的核心接口。
//!
//! ## 核心接口
//!
//! - [`DefinitionRegistry`] / [`AliasRegistry`] - 定义与别名注册表
//! - [`SingletonCache`] - 单例缓存
//! - [`BeanFactory`] / [`HierarchicalLookup`] - 查找与层级解析
//! - [`ConfigurableFactory`] - 作用域、后处理器、依赖关系等配置
//! - [`LifecycleControl`] - 冻结、预实例化与销毁
//! - [`Scope`] - 自定义作用域策略

pub mod container;
pub mod definition;
pub mod factory;
pub mod registry;
pub mod resolver;
pub mod scope;
pub mod singleton;

pub use container::*;
pub use definition::*;
pub use factory::*;
pub use registry::*;
pub use resolver::*;
pub use scope::*;
pub use singleton::*;
