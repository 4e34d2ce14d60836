//! # 基础设施组合层
//!
//! 负责把配置、日志、定义来源和协作方组合成一个启动完成的 Bean 工厂。
//!
//! ## 主要功能
//!
//! - **启动构建器**: 使用构建者模式收集启动所需的各个部分
//! - **定义来源**: 按顺序把定义与别名注册到工厂
//! - **生命周期管理**: 冻结、预实例化与关闭
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use di_abstractions::BeanDefinition;
//! use infrastructure_composition::{DefinitionSet, FactoryBootstrapper};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bootstrapped = FactoryBootstrapper::new()
//!         .with_settings_file("config/factory.toml")
//!         .with_logging(true)
//!         .add_definition_source(
//!             DefinitionSet::new("core").definition("clock", BeanDefinition::new()),
//!         )
//!         .build()?;
//!
//!     println!("工厂标识: {}", bootstrapped.factory().factory_id());
//!
//!     bootstrapped.shutdown()?;
//!     Ok(())
//! }
//! ```

pub mod bootstrapper;
pub mod builder;
pub mod source;

// 重新导出主要类型
pub use bootstrapper::BootstrappedFactory;
pub use builder::{init_logging, FactoryBootstrapper};
pub use source::{DefinitionSet, DefinitionSource};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
