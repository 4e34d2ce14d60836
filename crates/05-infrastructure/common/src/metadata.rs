//! 元数据定义
//!
//! 提供 Bean 目标类型的元数据信息

use std::any::TypeId;
use std::fmt;

/// 类型信息
///
/// 通过 [`TypeInfo::of`] 创建的类型信息携带 `TypeId`；仅通过名称创建的类型信息
/// 需要由工厂的类型解析上下文补全。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型名称（完整路径）
    pub name: String,
    /// 类型ID，仅按名称声明时为空
    pub id: Option<TypeId>,
}

impl TypeInfo {
    /// 创建新的类型信息
    pub fn new(type_id: TypeId, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: Some(type_id),
        }
    }

    /// 从类型获取类型信息
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            name: std::any::type_name::<T>().to_string(),
            id: Some(TypeId::of::<T>()),
        }
    }

    /// 从类型名称创建类型信息（尚未解析）
    pub fn from_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
        }
    }

    /// 是否已解析出具体类型
    pub fn is_resolved(&self) -> bool {
        self.id.is_some()
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        self.name.rsplit("::").next().unwrap_or(&self.name)
    }

    /// 判断两个类型信息是否指向同一类型
    ///
    /// 双方都已解析时比较 `TypeId`，否则退化为名称比较。
    pub fn matches(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => self.name == other.name || self.short_name() == other.short_name(),
        }
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
