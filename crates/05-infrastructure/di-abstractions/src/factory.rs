//! 工厂协作方接口
//!
//! 对象构造、后处理、占位符解析、自动装配候选判断和类型解析都由外部协作方提供，
//! 工厂只通过这些窄接口调用它们。

use crate::definition::MergedBeanDefinition;
use crate::resolver::BeanFactory;
use infrastructure_common::{BeanInstance, BoxError, TypeInfo};

/// Bean 构造器 trait
///
/// 在预实例化和延迟查找时被调用，负责根据合并后的定义构造实例。
pub trait BeanConstructor: Send + Sync {
    /// 构造 Bean 实例
    fn construct(
        &self,
        name: &str,
        definition: &MergedBeanDefinition,
        factory: &dyn BeanFactory,
    ) -> Result<BeanInstance, BoxError>;
}

/// Lambda 构造器包装器
pub struct LambdaConstructor<F> {
    constructor_fn: F,
}

impl<F> LambdaConstructor<F>
where
    F: Fn(&str, &MergedBeanDefinition, &dyn BeanFactory) -> Result<BeanInstance, BoxError>
        + Send
        + Sync
        + 'static,
{
    /// 包装构造函数
    pub fn new(constructor_fn: F) -> Self {
        Self { constructor_fn }
    }
}

impl<F> BeanConstructor for LambdaConstructor<F>
where
    F: Fn(&str, &MergedBeanDefinition, &dyn BeanFactory) -> Result<BeanInstance, BoxError>
        + Send
        + Sync
        + 'static,
{
    fn construct(
        &self,
        name: &str,
        definition: &MergedBeanDefinition,
        factory: &dyn BeanFactory,
    ) -> Result<BeanInstance, BoxError> {
        (self.constructor_fn)(name, definition, factory)
    }
}

/// Bean 后处理器
pub trait BeanPostProcessor: Send + Sync {
    /// 初始化前回调，可以替换实例
    fn post_process_before_initialization(
        &self,
        instance: BeanInstance,
        _name: &str,
    ) -> Result<BeanInstance, BoxError> {
        Ok(instance)
    }

    /// 初始化后回调，可以替换实例
    fn post_process_after_initialization(
        &self,
        instance: BeanInstance,
        _name: &str,
    ) -> Result<BeanInstance, BoxError> {
        Ok(instance)
    }

    /// 销毁感知能力
    fn as_destruction_aware(&self) -> Option<&dyn DestructionAwareBeanPostProcessor> {
        None
    }
}

/// 销毁感知的后处理器
pub trait DestructionAwareBeanPostProcessor: Send + Sync {
    /// 在 Bean 自身的销毁回调之前调用
    fn post_process_before_destruction(
        &self,
        instance: &BeanInstance,
        name: &str,
    ) -> Result<(), BoxError>;

    /// 该实例是否需要本处理器参与销毁
    fn requires_destruction(&self, _instance: &BeanInstance) -> bool {
        true
    }
}

/// 嵌入值解析器（占位符解析钩子）
pub trait StringValueResolver: Send + Sync {
    /// 解析字符串，返回 `None` 表示结果为空并终止解析链
    fn resolve_string_value(&self, value: &str) -> Option<String>;
}

impl<F> StringValueResolver for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn resolve_string_value(&self, value: &str) -> Option<String> {
        self(value)
    }
}

/// 自动装配候选判断
pub trait AutowireCandidateResolver: Send + Sync {
    /// 合并后的定义是否可以作为所需类型的候选者
    fn is_autowire_candidate(&self, definition: &MergedBeanDefinition, required: &TypeInfo) -> bool;
}

/// 类型解析上下文
///
/// 工厂级别、可替换的按名称解析类型的上下文，未设置时定义中的类型按原样使用。
pub trait TypeResolver: Send + Sync {
    /// 按名称解析类型
    fn resolve_type(&self, type_name: &str) -> Option<TypeInfo>;
}
