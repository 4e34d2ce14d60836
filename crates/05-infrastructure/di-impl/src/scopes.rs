//! 内置的自定义作用域实现

use di_abstractions::{DestructionCallback, Scope};
use indexmap::IndexMap;
use infrastructure_common::{BeanError, BeanInstance, BeanResult};
use parking_lot::Mutex;
use std::fmt;
use tracing::{debug, warn};
use uuid::Uuid;

/// 内存作用域
///
/// 实例保存到调用 [`InMemoryScope::clear`] 为止，清理时按注册的相反顺序执行销毁回调。
/// 适合表示请求、会话一类有明确结束点的作用域。
pub struct InMemoryScope {
    name: String,
    conversation_id: String,
    instances: Mutex<IndexMap<String, BeanInstance>>,
    callbacks: Mutex<IndexMap<String, DestructionCallback>>,
}

impl InMemoryScope {
    /// 创建作用域
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            conversation_id: Uuid::new_v4().to_string(),
            instances: Mutex::new(IndexMap::new()),
            callbacks: Mutex::new(IndexMap::new()),
        }
    }

    /// 作用域名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 当前保存的实例数量
    pub fn len(&self) -> usize {
        self.instances.lock().len()
    }

    /// 是否没有保存实例
    pub fn is_empty(&self) -> bool {
        self.instances.lock().is_empty()
    }

    /// 结束作用域：丢弃所有实例并执行销毁回调
    pub fn clear(&self) -> Result<(), Vec<BeanError>> {
        let callbacks: Vec<(String, DestructionCallback)> = self.callbacks.lock().drain(..).collect();
        self.instances.lock().clear();

        let mut failures = Vec::new();
        for (name, callback) in callbacks.into_iter().rev() {
            if let Err(source) = callback() {
                warn!("作用域 '{}' 中的 Bean '{}' 销毁失败: {}", self.name, name, source);
                failures.push(BeanError::destruction(name, source));
            }
        }

        debug!("作用域 '{}' 已清理", self.name);
        if failures.is_empty() {
            Ok(())
        } else {
            Err(failures)
        }
    }
}

impl fmt::Debug for InMemoryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryScope")
            .field("name", &self.name)
            .field("conversation_id", &self.conversation_id)
            .field("instances", &self.instances.lock().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Scope for InMemoryScope {
    fn get(
        &self,
        name: &str,
        object_factory: &dyn Fn() -> BeanResult<BeanInstance>,
    ) -> BeanResult<BeanInstance> {
        if let Some(existing) = self.instances.lock().get(name) {
            return Ok(existing.clone());
        }

        // 创建过程可能嵌套访问本作用域，不能持锁
        let created = object_factory()?;
        Ok(self
            .instances
            .lock()
            .entry(name.to_string())
            .or_insert(created)
            .clone())
    }

    fn remove(&self, name: &str) -> Option<BeanInstance> {
        self.callbacks.lock().shift_remove(name);
        self.instances.lock().shift_remove(name)
    }

    fn register_destruction_callback(&self, name: &str, callback: DestructionCallback) {
        self.callbacks.lock().insert(name.to_string(), callback);
    }

    fn conversation_id(&self) -> Option<String> {
        Some(self.conversation_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrastructure_common::{BoxError, ManagedComponent};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex as StdMutex};

    #[derive(Debug)]
    struct Session;

    impl ManagedComponent for Session {}

    #[test]
    fn test_get_creates_once() {
        let scope = InMemoryScope::new("request");
        let created = AtomicUsize::new(0);
        let factory = || -> BeanResult<BeanInstance> {
            created.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Session))
        };

        let first = scope.get("session", &factory).unwrap();
        let second = scope.get("session", &factory).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(created.load(Ordering::SeqCst), 1);
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn test_clear_runs_callbacks_in_reverse_order() {
        let scope = InMemoryScope::new("request");
        let order = Arc::new(StdMutex::new(Vec::new()));
        for name in ["first", "second"] {
            scope.get(name, &|| Ok(Arc::new(Session) as BeanInstance)).unwrap();
            let order = Arc::clone(&order);
            scope.register_destruction_callback(
                name,
                Box::new(move || -> Result<(), BoxError> {
                    order.lock().unwrap().push(name);
                    Ok(())
                }),
            );
        }

        scope.clear().unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["second", "first"]);
        assert!(scope.is_empty());
    }

    #[test]
    fn test_remove_drops_callback() {
        let scope = InMemoryScope::new("session");
        scope.get("cart", &|| Ok(Arc::new(Session) as BeanInstance)).unwrap();
        scope.register_destruction_callback("cart", Box::new(|| -> Result<(), BoxError> { Err("不应执行".into()) }));

        assert!(scope.remove("cart").is_some());
        assert!(scope.clear().is_ok());
    }

    #[test]
    fn test_clear_collects_failures() {
        let scope = InMemoryScope::new("session");
        scope.register_destruction_callback("a", Box::new(|| -> Result<(), BoxError> { Err("a 失败".into()) }));
        scope.register_destruction_callback("b", Box::new(|| -> Result<(), BoxError> { Ok(()) }));

        let failures = scope.clear().unwrap_err();
        assert_eq!(failures.len(), 1);
        assert!(matches!(&failures[0], BeanError::Destruction { name, .. } if name == "a"));
    }
}
