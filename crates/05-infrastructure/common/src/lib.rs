//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn ADSP Bean 工厂各层共享的基础类型。
//!
//! ## 核心组件
//!
//! - [`BeanError`] - 注册表、解析与生命周期的错误分类
//! - [`ManagedComponent`] - 受管 Bean 实例及其可选能力
//! - [`TypeInfo`] - Bean 目标类型元数据
//! - [`ApplicationSettings`] - 工厂与日志配置
//! - [`ConfigurationState`] - 配置冻结状态

pub mod component;
pub mod configuration;
pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use component::*;
pub use configuration::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
