//! 单例缓存抽象接口

use infrastructure_common::{BeanInstance, BeanResult};

/// 单例缓存 trait
///
/// 保存完全构造好的共享实例，并跟踪正在创建中的 Bean 以便检测循环构造。
pub trait SingletonCache: Send + Sync {
    /// 手动注册单例实例，同名单例已存在时失败
    fn register_singleton(&self, name: &str, instance: BeanInstance) -> BeanResult<()>;

    /// 获取已缓存的单例
    fn get_singleton(&self, name: &str) -> Option<BeanInstance>;

    /// 是否已缓存单例
    fn contains_singleton(&self, name: &str) -> bool;

    /// 按注册顺序返回单例名称
    fn get_singleton_names(&self) -> Vec<String>;

    /// 单例数量
    fn get_singleton_count(&self) -> usize;

    /// 显式设置 Bean 的创建中状态
    fn set_currently_in_creation(&self, name: &str, in_creation: bool);

    /// Bean 是否正在创建中
    fn is_currently_in_creation(&self, name: &str) -> bool;
}
