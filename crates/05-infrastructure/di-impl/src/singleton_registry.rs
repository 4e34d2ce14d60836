//! 单例注册表实现

use dashmap::DashSet;
use indexmap::IndexMap;
use infrastructure_common::{BeanError, BeanInstance, BeanResult};
use parking_lot::{ReentrantMutex, ReentrantMutexGuard, RwLock};
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, ThreadId};

/// 创建中标记守卫
///
/// 守卫释放时移除标记，无论创建成功还是失败。
#[derive(Debug)]
pub struct CreationGuard<'a, K: Eq + Hash> {
    flags: &'a DashSet<K>,
    key: Option<K>,
}

impl<'a, K: Eq + Hash + Clone> CreationGuard<'a, K> {
    fn acquire(flags: &'a DashSet<K>, key: K) -> Option<Self> {
        // insert 返回 false 说明标记已存在
        if flags.insert(key.clone()) {
            Some(Self {
                flags,
                key: Some(key),
            })
        } else {
            None
        }
    }
}

impl<K: Eq + Hash> Drop for CreationGuard<'_, K> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.flags.remove(&key);
        }
    }
}

/// 默认单例注册表
///
/// 单例按注册（创建完成）顺序保存，销毁时按相反顺序处理。
#[derive(Default)]
pub struct DefaultSingletonRegistry {
    singleton_objects: RwLock<IndexMap<String, BeanInstance>>,
    singletons_in_creation: DashSet<String>,
    prototypes_in_creation: DashSet<(ThreadId, String)>,
    creation_lock: ReentrantMutex<()>,
    in_destruction: AtomicBool,
}

impl std::fmt::Debug for DefaultSingletonRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultSingletonRegistry")
            .field("singletons", &self.names())
            .field("in_destruction", &self.is_in_destruction())
            .finish()
    }
}

impl DefaultSingletonRegistry {
    /// 创建新的单例注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 手动注册单例，同名单例已存在时失败
    pub fn register(&self, name: &str, instance: BeanInstance) -> BeanResult<()> {
        let mut objects = self.singleton_objects.write();
        if let Some(existing) = objects.get(name) {
            return Err(BeanError::illegal_state(format!(
                "无法注册单例 '{}': 已存在实例 {:?}",
                name, existing
            )));
        }
        objects.insert(name.to_string(), instance);
        Ok(())
    }

    /// 添加创建完成的单例，已存在时保留原实例并返回它
    pub fn add(&self, name: &str, instance: BeanInstance) -> BeanInstance {
        self.singleton_objects
            .write()
            .entry(name.to_string())
            .or_insert(instance)
            .clone()
    }

    /// 获取单例
    pub fn get(&self, name: &str) -> Option<BeanInstance> {
        self.singleton_objects.read().get(name).cloned()
    }

    /// 是否包含单例
    pub fn contains(&self, name: &str) -> bool {
        self.singleton_objects.read().contains_key(name)
    }

    /// 移除单例，保留其余单例的注册顺序
    pub fn remove(&self, name: &str) -> Option<BeanInstance> {
        self.singleton_objects.write().shift_remove(name)
    }

    /// 按注册顺序返回单例名称
    pub fn names(&self) -> Vec<String> {
        self.singleton_objects.read().keys().cloned().collect()
    }

    /// 单例数量
    pub fn count(&self) -> usize {
        self.singleton_objects.read().len()
    }

    /// 清空所有单例与创建标记
    pub fn clear(&self) {
        self.singleton_objects.write().clear();
        self.singletons_in_creation.clear();
    }

    /// 获取单例创建锁（可重入，同一线程内可嵌套创建依赖）
    pub fn creation_lock(&self) -> ReentrantMutexGuard<'_, ()> {
        self.creation_lock.lock()
    }

    /// 标记单例开始创建
    pub fn begin_singleton_creation(&self, name: &str) -> BeanResult<CreationGuard<'_, String>> {
        CreationGuard::acquire(&self.singletons_in_creation, name.to_string()).ok_or_else(|| {
            BeanError::CurrentlyInCreation {
                name: name.to_string(),
            }
        })
    }

    /// 标记当前线程开始创建原型
    pub fn begin_prototype_creation(
        &self,
        name: &str,
    ) -> BeanResult<CreationGuard<'_, (ThreadId, String)>> {
        CreationGuard::acquire(
            &self.prototypes_in_creation,
            (thread::current().id(), name.to_string()),
        )
        .ok_or_else(|| BeanError::CurrentlyInCreation {
            name: name.to_string(),
        })
    }

    /// 当前线程是否正在创建该原型
    pub fn is_prototype_currently_in_creation(&self, name: &str) -> bool {
        self.prototypes_in_creation
            .contains(&(thread::current().id(), name.to_string()))
    }

    /// 显式设置创建中标记
    pub fn set_currently_in_creation(&self, name: &str, in_creation: bool) {
        if in_creation {
            self.singletons_in_creation.insert(name.to_string());
        } else {
            self.singletons_in_creation.remove(name);
        }
    }

    /// 是否正在创建中
    pub fn is_currently_in_creation(&self, name: &str) -> bool {
        self.singletons_in_creation.contains(name)
    }

    /// 设置销毁中标记
    pub fn set_in_destruction(&self, in_destruction: bool) {
        self.in_destruction.store(in_destruction, Ordering::SeqCst);
    }

    /// 是否正在销毁单例
    pub fn is_in_destruction(&self) -> bool {
        self.in_destruction.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrastructure_common::ManagedComponent;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Marker(u32);

    impl ManagedComponent for Marker {}

    #[test]
    fn test_register_duplicate_fails() {
        let registry = DefaultSingletonRegistry::new();
        registry.register("a", Arc::new(Marker(1))).unwrap();

        let result = registry.register("a", Arc::new(Marker(2)));
        assert!(matches!(result, Err(BeanError::IllegalState { .. })));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_names_keep_registration_order_after_removal() {
        let registry = DefaultSingletonRegistry::new();
        for name in ["c", "a", "b"] {
            registry.register(name, Arc::new(Marker(0))).unwrap();
        }
        registry.remove("a");
        assert_eq!(registry.names(), vec!["c", "b"]);
    }

    #[test]
    fn test_add_keeps_first_instance() {
        let registry = DefaultSingletonRegistry::new();
        let first: BeanInstance = Arc::new(Marker(1));
        let kept = registry.add("x", first.clone());
        let again = registry.add("x", Arc::new(Marker(2)));
        assert!(Arc::ptr_eq(&kept, &first));
        assert!(Arc::ptr_eq(&again, &first));
    }

    #[test]
    fn test_creation_guard_clears_flag_on_drop() {
        let registry = DefaultSingletonRegistry::new();
        {
            let _guard = registry.begin_singleton_creation("svc").unwrap();
            assert!(registry.is_currently_in_creation("svc"));
            assert!(matches!(
                registry.begin_singleton_creation("svc"),
                Err(BeanError::CurrentlyInCreation { .. })
            ));
        }
        assert!(!registry.is_currently_in_creation("svc"));
    }

    #[test]
    fn test_prototype_flags_are_per_thread() {
        let registry = Arc::new(DefaultSingletonRegistry::new());
        let _guard = registry.begin_prototype_creation("proto").unwrap();
        assert!(registry.is_prototype_currently_in_creation("proto"));

        let other = Arc::clone(&registry);
        let seen_elsewhere = std::thread::spawn(move || other.is_prototype_currently_in_creation("proto"))
            .join()
            .unwrap();
        assert!(!seen_elsewhere);
    }

    #[test]
    fn test_explicit_creation_flag() {
        let registry = DefaultSingletonRegistry::new();
        registry.set_currently_in_creation("manual", true);
        assert!(registry.is_currently_in_creation("manual"));
        registry.set_currently_in_creation("manual", false);
        assert!(!registry.is_currently_in_creation("manual"));
    }
}
