//! Bean 定义来源

use di_abstractions::{BeanDefinition, DefinitionRegistry};
use infrastructure_common::BeanResult;
use tracing::debug;

/// Bean 定义来源
///
/// 启动时按添加顺序依次应用到工厂，每个来源负责注册自己的定义与别名。
pub trait DefinitionSource: Send + Sync {
    /// 来源名称，用于日志
    fn name(&self) -> &str;

    /// 将定义注册到注册表，返回注册的定义数量
    fn load_definitions(&self, registry: &dyn DefinitionRegistry) -> BeanResult<usize>;
}

/// 内存中的定义集合
#[derive(Debug, Clone, Default)]
pub struct DefinitionSet {
    name: String,
    definitions: Vec<(String, BeanDefinition)>,
    aliases: Vec<(String, String)>,
}

impl DefinitionSet {
    /// 创建空集合
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// 添加定义
    pub fn definition(mut self, name: impl Into<String>, definition: BeanDefinition) -> Self {
        self.definitions.push((name.into(), definition));
        self
    }

    /// 添加别名
    pub fn alias(mut self, name: impl Into<String>, alias: impl Into<String>) -> Self {
        self.aliases.push((name.into(), alias.into()));
        self
    }

    /// 定义数量
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl DefinitionSource for DefinitionSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_definitions(&self, registry: &dyn DefinitionRegistry) -> BeanResult<usize> {
        for (name, definition) in &self.definitions {
            registry.register_bean_definition(name, definition.clone())?;
        }
        // 别名在本来源的全部定义之后注册
        for (name, alias) in &self.aliases {
            registry.register_alias(name, alias)?;
        }
        debug!(
            "定义来源 '{}' 注册了 {} 个定义和 {} 个别名",
            self.name,
            self.definitions.len(),
            self.aliases.len()
        );
        Ok(self.definitions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use di_abstractions::AliasRegistry;
    use di_impl::DefaultBeanFactory;

    #[test]
    fn test_definition_set_registers_in_order() {
        let factory = DefaultBeanFactory::new();
        let set = DefinitionSet::new("core")
            .definition("dataSource", BeanDefinition::new())
            .definition("repository", BeanDefinition::new().with_depends_on(["dataSource"]))
            .alias("dataSource", "ds");

        assert_eq!(set.len(), 2);
        assert_eq!(set.load_definitions(&factory).unwrap(), 2);
        assert_eq!(
            factory.get_bean_definition_names(),
            vec!["dataSource", "repository"]
        );
        assert_eq!(factory.canonical_name("ds"), "dataSource");
    }

    #[test]
    fn test_registration_error_is_propagated() {
        let factory = DefaultBeanFactory::new();
        let set = DefinitionSet::new("broken").definition(" ", BeanDefinition::new());
        assert!(set.load_definitions(&factory).is_err());
        assert_eq!(factory.get_bean_definition_count(), 0);
    }
}
