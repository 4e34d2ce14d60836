//! Bean 查找与层级解析抽象接口

use crate::definition::MergedBeanDefinition;
use infrastructure_common::{downcast_bean, BeanError, BeanInstance, BeanResult, TypeInfo};
use std::any::Any;
use std::sync::Arc;

/// 基础 Bean 查找 trait
pub trait BeanFactory: Send + Sync {
    /// 按名称或别名获取 Bean 实例，必要时创建
    fn get_bean(&self, name: &str) -> BeanResult<BeanInstance>;

    /// 本工厂或任一祖先工厂是否可以提供该名称的 Bean
    fn contains_bean(&self, name: &str) -> bool;

    /// 是否为单例
    fn is_singleton(&self, name: &str) -> BeanResult<bool>;

    /// 是否为原型
    fn is_prototype(&self, name: &str) -> BeanResult<bool>;

    /// 获取 Bean 的目标类型
    fn get_type(&self, name: &str) -> BeanResult<Option<TypeInfo>>;
}

/// 层级查找 trait
///
/// 查找先检查本地注册表，再沿父工厂链向上，子工厂的定义遮蔽祖先中的同名定义。
pub trait HierarchicalLookup: BeanFactory {
    /// 直接父工厂
    fn get_parent_bean_factory(&self) -> Option<Arc<dyn HierarchicalLookup>>;

    /// 仅检查本地工厂，忽略祖先
    fn contains_local_bean(&self, name: &str) -> bool;

    /// 获取合并后的 Bean 定义，本地没有定义时委托给父工厂
    fn get_merged_bean_definition(&self, name: &str) -> BeanResult<Arc<MergedBeanDefinition>>;
}

/// 类型化查找扩展
pub trait BeanFactoryExt: BeanFactory {
    /// 获取 Bean 并还原为具体类型
    fn get_bean_as<T: Any + Send + Sync>(&self, name: &str) -> BeanResult<Arc<T>> {
        let instance = self.get_bean(name)?;
        downcast_bean::<T>(&instance).ok_or_else(|| {
            BeanError::illegal_state(format!(
                "Bean '{}' 不是所需类型 {}",
                name,
                std::any::type_name::<T>()
            ))
        })
    }
}

impl<F: BeanFactory + ?Sized> BeanFactoryExt for F {}
