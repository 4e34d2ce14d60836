//! 作用域抽象接口

use infrastructure_common::{BeanInstance, BeanResult, BoxError};
use std::fmt::Debug;

/// 销毁回调
pub type DestructionCallback = Box<dyn FnOnce() -> Result<(), BoxError> + Send>;

/// 作用域策略
///
/// 自定义作用域按名称注册到工厂，`singleton` 与 `prototype` 为保留名称。
pub trait Scope: Send + Sync + Debug {
    /// 从作用域获取实例，不存在时通过 `object_factory` 创建并保存
    fn get(
        &self,
        name: &str,
        object_factory: &dyn Fn() -> BeanResult<BeanInstance>,
    ) -> BeanResult<BeanInstance>;

    /// 从作用域移除实例，同时移除其销毁回调
    fn remove(&self, name: &str) -> Option<BeanInstance>;

    /// 注册在作用域结束时执行的销毁回调
    fn register_destruction_callback(&self, name: &str, callback: DestructionCallback);

    /// 解析上下文对象
    fn resolve_contextual_object(&self, _key: &str) -> Option<BeanInstance> {
        None
    }

    /// 会话标识
    fn conversation_id(&self) -> Option<String> {
        None
    }
}
