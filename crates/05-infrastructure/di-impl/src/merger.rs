//! 合并定义缓存与合并算法
//!
//! 合并结果按名称缓存。缓存写入带有定义存储的代数校验：合并开始后若存储发生过变更，
//! 计算结果仍返回给调用者，但不会写入缓存，从而避免并发写入留下过期条目。

use crate::definition_registry::DefinitionStore;
use crate::factory::DefaultBeanFactory;
use di_abstractions::{ConfigurableFactory, MergedBeanDefinition};
use infrastructure_common::{BeanError, BeanResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 合并定义缓存
#[derive(Debug, Default)]
pub struct MergedDefinitionCache {
    entries: RwLock<HashMap<String, Arc<MergedBeanDefinition>>>,
}

impl MergedDefinitionCache {
    /// 创建空缓存
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取缓存的合并定义
    pub fn get(&self, name: &str) -> Option<Arc<MergedBeanDefinition>> {
        self.entries.read().get(name).cloned()
    }

    /// 在存储代数未变化时写入缓存
    ///
    /// 返回最终生效的合并定义：已有缓存条目时返回该条目，保证重复查询得到同一个引用。
    pub fn insert_if_current(
        &self,
        name: &str,
        merged: Arc<MergedBeanDefinition>,
        generation: u64,
        store: &DefinitionStore,
    ) -> Arc<MergedBeanDefinition> {
        let mut entries = self.entries.write();
        if store.generation() != generation {
            debug!("Bean '{}' 的定义在合并期间发生变化，不缓存本次合并结果", name);
            return merged;
        }
        entries.entry(name.to_string()).or_insert(merged).clone()
    }

    /// 移除单个条目
    pub fn evict(&self, name: &str) -> bool {
        self.entries.write().remove(name).is_some()
    }

    /// 清空缓存
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// 缓存条目数量
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl DefaultBeanFactory {
    /// 获取本地定义的合并结果，`bean_name` 必须是规范名称
    pub(crate) fn merged_local_definition(
        &self,
        bean_name: &str,
    ) -> BeanResult<Arc<MergedBeanDefinition>> {
        let mut visiting = Vec::new();
        self.merge_definition(bean_name, &mut visiting)
    }

    fn merge_definition(
        &self,
        bean_name: &str,
        visiting: &mut Vec<String>,
    ) -> BeanResult<Arc<MergedBeanDefinition>> {
        if visiting.iter().any(|name| name == bean_name) {
            visiting.push(bean_name.to_string());
            return Err(BeanError::definition_store(
                bean_name,
                format!("父定义存在循环: {}", visiting.join(" -> ")),
            ));
        }

        if let Some(cached) = self.merged.get(bean_name) {
            return Ok(cached);
        }

        let snapshot = self.definitions.snapshot();
        let definition = snapshot
            .definitions
            .get(bean_name)
            .cloned()
            .ok_or_else(|| BeanError::no_such_definition(bean_name))?;

        let merged = match definition.parent_name.as_deref() {
            None => MergedBeanDefinition::from_root(bean_name, &definition),
            Some(parent_name) => {
                let parent_bean_name = self.aliases.canonical_name(parent_name);
                visiting.push(bean_name.to_string());
                let parent = if parent_bean_name != bean_name
                    && snapshot.definitions.contains_key(&parent_bean_name)
                {
                    self.merge_definition(&parent_bean_name, visiting)
                } else {
                    self.merged_parent_from_ancestor(bean_name, &parent_bean_name)
                };
                visiting.pop();
                let parent = parent?;
                MergedBeanDefinition::from_parent(bean_name, &*parent, &definition)
            }
        };

        let merged = Arc::new(self.post_process_merged(merged));
        debug!("合并 Bean 定义 '{}' (scope='{}')", bean_name, merged.scope);

        if self.is_cache_bean_metadata() {
            Ok(self
                .merged
                .insert_if_current(bean_name, merged, snapshot.generation, &self.definitions))
        } else {
            Ok(merged)
        }
    }

    /// 父定义与 Bean 同名或本地不存在时，向父工厂请求合并定义
    fn merged_parent_from_ancestor(
        &self,
        bean_name: &str,
        parent_bean_name: &str,
    ) -> BeanResult<Arc<MergedBeanDefinition>> {
        let Some(parent_factory) = self.parent.get() else {
            let message = if parent_bean_name == bean_name {
                format!("父定义名称 '{}' 与 Bean 名称相同，但没有父工厂", parent_bean_name)
            } else {
                format!("找不到父定义 '{}'", parent_bean_name)
            };
            return Err(BeanError::definition_store(bean_name, message));
        };

        parent_factory
            .get_merged_bean_definition(parent_bean_name)
            .map_err(|err| match err {
                BeanError::NoSuchDefinition { .. } => BeanError::definition_store(
                    bean_name,
                    format!("父工厂中也找不到父定义 '{}'", parent_bean_name),
                ),
                other => other,
            })
    }

    /// 对合并结果应用嵌入值解析与类型解析
    fn post_process_merged(&self, mut merged: MergedBeanDefinition) -> MergedBeanDefinition {
        if self.has_embedded_value_resolver() {
            if !merged.scope.is_empty() {
                merged.scope = self.resolve_embedded_value(&merged.scope).unwrap_or_default();
            }
            merged.depends_on = merged
                .depends_on
                .iter()
                .filter_map(|name| self.resolve_embedded_value(name))
                .collect();
        }

        if let Some(resolver) = self.type_resolver() {
            let resolved = merged
                .bean_type
                .as_ref()
                .filter(|bean_type| !bean_type.is_resolved())
                .and_then(|bean_type| resolver.resolve_type(&bean_type.name));
            if resolved.is_some() {
                merged.bean_type = resolved;
            }
        }
        merged
    }
}
