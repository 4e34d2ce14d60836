//! Bean 定义存储
//!
//! 定义映射以写时复制快照的形式保存：读操作加载当前快照后无锁访问，
//! 写操作在互斥锁内复制、修改并原子替换快照，每次替换都递增代数。

use arc_swap::ArcSwap;
use di_abstractions::BeanDefinition;
use indexmap::IndexMap;
use infrastructure_common::{BeanError, BeanResult};
use parking_lot::Mutex;
use std::sync::Arc;

/// 定义快照
#[derive(Debug, Default)]
pub struct DefinitionSnapshot {
    /// 快照代数，每次变更递增
    pub generation: u64,
    /// 按注册顺序保存的定义
    pub definitions: IndexMap<String, Arc<BeanDefinition>>,
}

/// 写时复制的 Bean 定义存储
#[derive(Debug, Default)]
pub struct DefinitionStore {
    snapshot: ArcSwap<DefinitionSnapshot>,
    write_lock: Mutex<()>,
}

impl DefinitionStore {
    /// 创建空的定义存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入或替换定义，返回被替换的旧定义
    ///
    /// 替换时保持原有的注册位置。`allow_overriding` 为 false 且名称已存在时失败，
    /// 存储保持不变。
    pub fn insert(
        &self,
        name: &str,
        definition: impl Into<Arc<BeanDefinition>>,
        allow_overriding: bool,
    ) -> BeanResult<Option<Arc<BeanDefinition>>> {
        let _guard = self.write_lock.lock();
        let current = self.snapshot.load_full();

        let previous = current.definitions.get(name).cloned();
        if let Some(existing) = &previous {
            if !allow_overriding {
                return Err(BeanError::definition_store(
                    name,
                    format!("不允许覆盖已存在的定义 {:?}", existing.bean_type),
                ));
            }
        }

        let mut definitions = current.definitions.clone();
        definitions.insert(name.to_string(), definition.into());
        self.snapshot.store(Arc::new(DefinitionSnapshot {
            generation: current.generation + 1,
            definitions,
        }));
        Ok(previous)
    }

    /// 移除定义，返回被移除的定义
    pub fn remove(&self, name: &str) -> Option<Arc<BeanDefinition>> {
        let _guard = self.write_lock.lock();
        let current = self.snapshot.load_full();
        if !current.definitions.contains_key(name) {
            return None;
        }

        let mut definitions = current.definitions.clone();
        let removed = definitions.shift_remove(name);
        self.snapshot.store(Arc::new(DefinitionSnapshot {
            generation: current.generation + 1,
            definitions,
        }));
        removed
    }

    /// 获取定义
    pub fn get(&self, name: &str) -> Option<Arc<BeanDefinition>> {
        self.snapshot.load().definitions.get(name).cloned()
    }

    /// 是否包含定义
    pub fn contains(&self, name: &str) -> bool {
        self.snapshot.load().definitions.contains_key(name)
    }

    /// 按注册顺序返回定义名称
    pub fn names(&self) -> Vec<String> {
        self.snapshot.load().definitions.keys().cloned().collect()
    }

    /// 定义数量
    pub fn count(&self) -> usize {
        self.snapshot.load().definitions.len()
    }

    /// 当前快照
    pub fn snapshot(&self) -> Arc<DefinitionSnapshot> {
        self.snapshot.load_full()
    }

    /// 当前代数
    pub fn generation(&self) -> u64 {
        self.snapshot.load().generation
    }
}
