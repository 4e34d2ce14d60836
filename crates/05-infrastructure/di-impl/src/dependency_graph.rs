//! Bean 依赖关系图

use indexmap::{IndexMap, IndexSet};

/// 依赖关系图
///
/// 同时维护两个方向的边：`dependent_beans[a]` 是依赖于 `a` 的 Bean，
/// `dependencies_for_bean[b]` 是 `b` 依赖的 Bean。两侧始终保持一致。
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    dependent_beans: IndexMap<String, IndexSet<String>>,
    dependencies_for_bean: IndexMap<String, IndexSet<String>>,
}

impl DependencyGraph {
    /// 创建空的依赖关系图
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录 `dependent` 依赖于 `bean`，返回是否新增了边
    pub fn register(&mut self, bean: &str, dependent: &str) -> bool {
        let added = self
            .dependent_beans
            .entry(bean.to_string())
            .or_default()
            .insert(dependent.to_string());
        self.dependencies_for_bean
            .entry(dependent.to_string())
            .or_default()
            .insert(bean.to_string());
        added
    }

    /// 依赖于 `bean` 的 Bean 名称
    pub fn dependents_of(&self, bean: &str) -> Vec<String> {
        self.dependent_beans
            .get(bean)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// `bean` 依赖的 Bean 名称
    pub fn dependencies_of(&self, bean: &str) -> Vec<String> {
        self.dependencies_for_bean
            .get(bean)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// 是否有 Bean 依赖于 `bean`
    pub fn has_dependents(&self, bean: &str) -> bool {
        self.dependent_beans
            .get(bean)
            .is_some_and(|set| !set.is_empty())
    }

    /// `dependent` 是否传递地依赖于 `bean`
    pub fn is_dependent(&self, bean: &str, dependent: &str) -> bool {
        let mut seen = IndexSet::new();
        self.is_dependent_inner(bean, dependent, &mut seen)
    }

    fn is_dependent_inner(&self, bean: &str, dependent: &str, seen: &mut IndexSet<String>) -> bool {
        if !seen.insert(bean.to_string()) {
            return false;
        }
        let Some(dependents) = self.dependent_beans.get(bean) else {
            return false;
        };
        if dependents.contains(dependent) {
            return true;
        }
        dependents
            .iter()
            .any(|transitive| self.is_dependent_inner(transitive, dependent, seen))
    }

    /// 取出依赖于 `bean` 的全部 Bean，并删除对应的边
    ///
    /// 销毁时使用：边被取出后，环中的 Bean 不会被再次访问。
    pub fn take_dependents(&mut self, bean: &str) -> Vec<String> {
        let Some(dependents) = self.dependent_beans.shift_remove(bean) else {
            return Vec::new();
        };
        for dependent in &dependents {
            if let Some(dependencies) = self.dependencies_for_bean.get_mut(dependent) {
                dependencies.shift_remove(bean);
                if dependencies.is_empty() {
                    self.dependencies_for_bean.shift_remove(dependent);
                }
            }
        }
        dependents.into_iter().collect()
    }

    /// 删除所有涉及 `bean` 的边
    pub fn remove_bean(&mut self, bean: &str) {
        self.take_dependents(bean);

        if let Some(dependencies) = self.dependencies_for_bean.shift_remove(bean) {
            for dependency in dependencies {
                if let Some(dependents) = self.dependent_beans.get_mut(&dependency) {
                    dependents.shift_remove(bean);
                    if dependents.is_empty() {
                        self.dependent_beans.shift_remove(&dependency);
                    }
                }
            }
        }
    }

    /// 清空
    pub fn clear(&mut self) {
        self.dependent_beans.clear();
        self.dependencies_for_bean.clear();
    }

    /// 是否没有任何边
    pub fn is_empty(&self) -> bool {
        self.dependent_beans.is_empty()
    }
}
