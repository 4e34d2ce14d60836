//! 受管组件接口定义
//!
//! 工厂中保存的所有 Bean 实例都以 [`BeanInstance`] 的形式出现。实例的可选能力
//! （销毁回调、单例预实例化完成回调）通过能力查询方法暴露，而不是依赖运行时反射。

use crate::errors::BoxError;
use crate::metadata::TypeInfo;
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// 类型擦除辅助 trait
///
/// 对所有 `Any + Send + Sync` 类型自动实现，用于把受管组件还原为具体类型。
pub trait AsAny: Any + Send + Sync {
    /// 以 `&dyn Any` 形式借用
    fn as_any(&self) -> &dyn Any;

    /// 转换为 `Arc<dyn Any>`
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// 实例的具体类型信息
    ///
    /// 对 `Arc<dyn ManagedComponent>` 需先解引用再调用，否则得到的是 `Arc` 自身的类型。
    fn component_type(&self) -> TypeInfo;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn component_type(&self) -> TypeInfo {
        TypeInfo::of::<T>()
    }
}

/// 受管组件 trait
///
/// 所有由工厂缓存或销毁的实例都必须实现此 trait。默认不具备任何额外能力。
pub trait ManagedComponent: AsAny + Debug {
    /// 销毁能力
    fn as_disposable(&self) -> Option<&dyn DisposableComponent> {
        None
    }

    /// 单例预实例化完成回调能力
    fn as_smart_initializing(&self) -> Option<&dyn SmartInitializingSingleton> {
        None
    }
}

/// Bean 实例
pub type BeanInstance = Arc<dyn ManagedComponent>;

/// 可销毁组件
pub trait DisposableComponent: Send + Sync {
    /// 释放组件持有的资源
    fn destroy(&self) -> Result<(), BoxError>;
}

/// 在所有非延迟单例预实例化完成后收到回调的组件
pub trait SmartInitializingSingleton: Send + Sync {
    /// 所有单例创建完成后调用
    fn after_singletons_instantiated(&self) -> Result<(), BoxError>;
}

/// 将 Bean 实例还原为具体类型
pub fn downcast_bean<T: Any + Send + Sync>(instance: &BeanInstance) -> Option<Arc<T>> {
    Arc::clone(instance).into_any().downcast::<T>().ok()
}

/// 以引用形式将 Bean 实例还原为具体类型
pub fn downcast_bean_ref<T: Any>(instance: &BeanInstance) -> Option<&T> {
    (**instance).as_any().downcast_ref::<T>()
}
