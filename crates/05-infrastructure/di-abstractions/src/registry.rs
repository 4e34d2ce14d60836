//! 别名与 Bean 定义注册表抽象接口

use crate::definition::BeanDefinition;
use infrastructure_common::BeanResult;
use std::sync::Arc;

/// 别名注册表 trait
///
/// 维护 别名 -> 规范名称 的映射，保证映射中不存在环。
pub trait AliasRegistry: Send + Sync {
    /// 为名称注册别名
    ///
    /// 别名与名称相同时移除已有别名；重复注册同一映射不做任何事。
    fn register_alias(&self, name: &str, alias: &str) -> BeanResult<()>;

    /// 移除别名
    fn remove_alias(&self, alias: &str) -> BeanResult<()>;

    /// 判断名称是否为别名
    fn is_alias(&self, name: &str) -> bool;

    /// 获取名称的所有别名（包括传递别名）
    fn get_aliases(&self, name: &str) -> Vec<String>;

    /// 将名称或别名解析为规范名称
    fn canonical_name(&self, name: &str) -> String;
}

/// Bean 定义注册表 trait
///
/// 所有方法都可以在读流量进行中并发调用。
pub trait DefinitionRegistry: AliasRegistry {
    /// 注册 Bean 定义，已存在时按覆盖策略替换
    fn register_bean_definition(&self, name: &str, definition: BeanDefinition) -> BeanResult<()>;

    /// 移除 Bean 定义
    fn remove_bean_definition(&self, name: &str) -> BeanResult<()>;

    /// 获取原始（未合并的）Bean 定义
    fn get_bean_definition(&self, name: &str) -> BeanResult<Arc<BeanDefinition>>;

    /// 是否包含 Bean 定义
    fn contains_bean_definition(&self, name: &str) -> bool;

    /// 按注册顺序返回所有 Bean 定义名称
    fn get_bean_definition_names(&self) -> Vec<String>;

    /// Bean 定义数量
    fn get_bean_definition_count(&self) -> usize;

    /// 名称是否已被使用（定义名、别名或手动注册的单例名）
    fn is_bean_name_in_use(&self, name: &str) -> bool;
}
