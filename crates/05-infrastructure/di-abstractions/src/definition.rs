//! Bean 定义数据模型
//!
//! [`BeanDefinition`] 是注册表中保存的原始元数据记录，所有可继承字段都是可选的；
//! [`MergedBeanDefinition`] 是与父定义合并后的只读视图，所有字段都已确定。

use indexmap::IndexMap;
use infrastructure_common::TypeInfo;
use serde_json::Value;
use std::collections::BTreeMap;

/// 标准单例作用域标识
pub const SCOPE_SINGLETON: &str = "singleton";

/// 标准原型作用域标识
pub const SCOPE_PROTOTYPE: &str = "prototype";

/// 默认作用域（空字符串，等价于单例）
pub const SCOPE_DEFAULT: &str = "";

/// Bean 角色提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum BeanRole {
    /// 应用自身的主要组件
    #[default]
    Application,
    /// 较大配置中的支撑部分
    Support,
    /// 纯内部基础设施
    Infrastructure,
}

/// Bean 定义
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BeanDefinition {
    /// 目标类型
    pub bean_type: Option<TypeInfo>,
    /// 作用域标识
    pub scope: Option<String>,
    /// 是否延迟初始化
    pub lazy_init: Option<bool>,
    /// 是否为抽象定义（仅作为模板，不可实例化，不参与继承）
    pub is_abstract: bool,
    /// 父定义名称
    pub parent_name: Option<String>,
    /// 必须先于本 Bean 初始化的 Bean 名称
    pub depends_on: Option<Vec<String>>,
    /// 是否作为自动装配候选者
    pub autowire_candidate: Option<bool>,
    /// 是否为首选候选者
    pub primary: Option<bool>,
    /// 角色提示
    pub role: Option<BeanRole>,
    /// 优先级提示，数值越高优先级越高
    pub priority: Option<i32>,
    /// 构造参数，按下标索引
    pub constructor_args: BTreeMap<usize, Value>,
    /// 属性值，按属性名索引
    pub property_values: IndexMap<String, Value>,
    /// 初始化方法名称
    pub init_method_name: Option<String>,
    /// 销毁方法名称
    pub destroy_method_name: Option<String>,
    /// 描述
    pub description: Option<String>,
}

impl BeanDefinition {
    /// 创建空定义
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建指定目标类型的定义
    pub fn of_type(bean_type: TypeInfo) -> Self {
        Self::new().with_type(bean_type)
    }

    /// 创建继承指定父定义的子定义
    pub fn child_of(parent_name: impl Into<String>) -> Self {
        Self::new().with_parent(parent_name)
    }

    /// 设置目标类型
    pub fn with_type(mut self, bean_type: TypeInfo) -> Self {
        self.bean_type = Some(bean_type);
        self
    }

    /// 设置作用域
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// 设置延迟初始化
    pub fn with_lazy_init(mut self, lazy_init: bool) -> Self {
        self.lazy_init = Some(lazy_init);
        self
    }

    /// 标记为抽象定义
    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    /// 设置父定义
    pub fn with_parent(mut self, parent_name: impl Into<String>) -> Self {
        self.parent_name = Some(parent_name.into());
        self
    }

    /// 设置依赖的 Bean
    pub fn with_depends_on<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// 设置是否为自动装配候选者
    pub fn with_autowire_candidate(mut self, candidate: bool) -> Self {
        self.autowire_candidate = Some(candidate);
        self
    }

    /// 设置是否为首选候选者
    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = Some(primary);
        self
    }

    /// 设置角色
    pub fn with_role(mut self, role: BeanRole) -> Self {
        self.role = Some(role);
        self
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// 设置构造参数
    pub fn with_constructor_arg(mut self, index: usize, value: Value) -> Self {
        self.constructor_args.insert(index, value);
        self
    }

    /// 设置属性值
    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.property_values.insert(name.into(), value);
        self
    }

    /// 设置初始化方法
    pub fn with_init_method(mut self, name: impl Into<String>) -> Self {
        self.init_method_name = Some(name.into());
        self
    }

    /// 设置销毁方法
    pub fn with_destroy_method(mut self, name: impl Into<String>) -> Self {
        self.destroy_method_name = Some(name.into());
        self
    }

    /// 设置描述
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 生效的角色
    pub fn effective_role(&self) -> BeanRole {
        self.role.unwrap_or_default()
    }
}

/// 合并后的 Bean 定义
///
/// 由子定义与其父定义的合并结果派生，所有字段都已确定。
#[derive(Debug, Clone, PartialEq)]
pub struct MergedBeanDefinition {
    /// Bean 名称
    pub bean_name: String,
    /// 原始父定义名称
    pub parent_name: Option<String>,
    /// 目标类型
    pub bean_type: Option<TypeInfo>,
    /// 作用域，空字符串表示单例
    pub scope: String,
    /// 是否延迟初始化
    pub lazy_init: bool,
    /// 是否为抽象定义
    pub is_abstract: bool,
    /// 必须先于本 Bean 初始化的 Bean 名称
    pub depends_on: Vec<String>,
    /// 是否作为自动装配候选者
    pub autowire_candidate: bool,
    /// 是否为首选候选者
    pub primary: bool,
    /// 角色
    pub role: BeanRole,
    /// 优先级
    pub priority: Option<i32>,
    /// 构造参数
    pub constructor_args: BTreeMap<usize, Value>,
    /// 属性值
    pub property_values: IndexMap<String, Value>,
    /// 初始化方法名称
    pub init_method_name: Option<String>,
    /// 销毁方法名称
    pub destroy_method_name: Option<String>,
    /// 描述
    pub description: Option<String>,
}

impl MergedBeanDefinition {
    /// 由没有父定义的定义直接生成
    pub fn from_root(bean_name: impl Into<String>, definition: &BeanDefinition) -> Self {
        Self {
            bean_name: bean_name.into(),
            parent_name: definition.parent_name.clone(),
            bean_type: definition.bean_type.clone(),
            scope: definition.scope.clone().unwrap_or_default(),
            lazy_init: definition.lazy_init.unwrap_or(false),
            is_abstract: definition.is_abstract,
            depends_on: definition.depends_on.clone().unwrap_or_default(),
            autowire_candidate: definition.autowire_candidate.unwrap_or(true),
            primary: definition.primary.unwrap_or(false),
            role: definition.effective_role(),
            priority: definition.priority,
            constructor_args: definition.constructor_args.clone(),
            property_values: definition.property_values.clone(),
            init_method_name: definition.init_method_name.clone(),
            destroy_method_name: definition.destroy_method_name.clone(),
            description: definition.description.clone(),
        }
    }

    /// 以已合并的父定义为基础，应用子定义中显式设置的字段
    ///
    /// 子定义显式设置的字段总是覆盖父定义；未设置的字段取父定义的值。
    /// `is_abstract` 不继承。
    pub fn from_parent(
        bean_name: impl Into<String>,
        parent: &MergedBeanDefinition,
        child: &BeanDefinition,
    ) -> Self {
        let mut constructor_args = parent.constructor_args.clone();
        constructor_args.extend(
            child
                .constructor_args
                .iter()
                .map(|(index, value)| (*index, value.clone())),
        );

        let mut property_values = parent.property_values.clone();
        for (name, value) in &child.property_values {
            property_values.insert(name.clone(), value.clone());
        }

        Self {
            bean_name: bean_name.into(),
            parent_name: child.parent_name.clone(),
            bean_type: child.bean_type.clone().or_else(|| parent.bean_type.clone()),
            // 空字符串视为未设置，沿用父定义的作用域
            scope: child
                .scope
                .clone()
                .filter(|scope| !scope.is_empty())
                .unwrap_or_else(|| parent.scope.clone()),
            lazy_init: child.lazy_init.unwrap_or(parent.lazy_init),
            is_abstract: child.is_abstract,
            depends_on: child
                .depends_on
                .clone()
                .unwrap_or_else(|| parent.depends_on.clone()),
            autowire_candidate: child.autowire_candidate.unwrap_or(parent.autowire_candidate),
            primary: child.primary.unwrap_or(parent.primary),
            role: child.role.unwrap_or(parent.role),
            priority: child.priority.or(parent.priority),
            constructor_args,
            property_values,
            init_method_name: child
                .init_method_name
                .clone()
                .or_else(|| parent.init_method_name.clone()),
            destroy_method_name: child
                .destroy_method_name
                .clone()
                .or_else(|| parent.destroy_method_name.clone()),
            description: child
                .description
                .clone()
                .or_else(|| parent.description.clone()),
        }
    }

    /// 是否为单例作用域
    pub fn is_singleton(&self) -> bool {
        self.scope == SCOPE_SINGLETON || self.scope == SCOPE_DEFAULT
    }

    /// 是否为原型作用域
    pub fn is_prototype(&self) -> bool {
        self.scope == SCOPE_PROTOTYPE
    }

    /// 是否为自定义作用域
    pub fn is_custom_scoped(&self) -> bool {
        !self.is_singleton() && !self.is_prototype()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root_defaults() {
        let merged = MergedBeanDefinition::from_root("a", &BeanDefinition::new());
        assert!(merged.is_singleton());
        assert!(!merged.lazy_init);
        assert!(merged.autowire_candidate);
        assert_eq!(merged.role, BeanRole::Application);
    }

    #[test]
    fn test_child_fields_win_and_unset_fields_inherit() {
        let parent_def = BeanDefinition::of_type(TypeInfo::from_name("Pool"))
            .with_scope(SCOPE_PROTOTYPE)
            .with_lazy_init(true)
            .with_abstract(true)
            .with_property("size", json!(4))
            .with_property("name", json!("parent"))
            .with_constructor_arg(0, json!("url"))
            .with_destroy_method("close");
        let parent = MergedBeanDefinition::from_root("base", &parent_def);

        let child_def = BeanDefinition::child_of("base")
            .with_lazy_init(false)
            .with_property("name", json!("child"))
            .with_constructor_arg(1, json!(30));
        let merged = MergedBeanDefinition::from_parent("pool", &parent, &child_def);

        assert_eq!(merged.scope, SCOPE_PROTOTYPE);
        assert!(!merged.lazy_init);
        assert!(!merged.is_abstract);
        assert_eq!(merged.bean_type, Some(TypeInfo::from_name("Pool")));
        assert_eq!(merged.property_values["size"], json!(4));
        assert_eq!(merged.property_values["name"], json!("child"));
        assert_eq!(merged.constructor_args.len(), 2);
        assert_eq!(merged.destroy_method_name.as_deref(), Some("close"));
        assert_eq!(merged.parent_name.as_deref(), Some("base"));
    }

    #[test]
    fn test_empty_child_scope_inherits_parent_scope() {
        let parent = MergedBeanDefinition::from_root(
            "base",
            &BeanDefinition::new().with_scope(SCOPE_PROTOTYPE),
        );

        let merged =
            MergedBeanDefinition::from_parent("child", &parent, &BeanDefinition::child_of("base").with_scope(""));
        assert!(merged.is_prototype());

        let explicit = MergedBeanDefinition::from_parent(
            "other",
            &parent,
            &BeanDefinition::child_of("base").with_scope(SCOPE_SINGLETON),
        );
        assert!(explicit.is_singleton());
    }

    #[test]
    fn test_scope_classification() {
        let custom = MergedBeanDefinition::from_root("r", &BeanDefinition::new().with_scope("request"));
        assert!(custom.is_custom_scoped());
        assert!(!custom.is_singleton());

        let explicit = MergedBeanDefinition::from_root("s", &BeanDefinition::new().with_scope(SCOPE_SINGLETON));
        assert!(explicit.is_singleton());
    }
}
