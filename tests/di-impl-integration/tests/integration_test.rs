//! 跨 crate 的 Bean 工厂集成测试：层级工厂、启动流程与有序关闭

use di_abstractions::{
    BeanConstructor, BeanDefinition, BeanFactory, BeanFactoryExt, ConfigurableFactory,
    DefinitionRegistry, HierarchicalLookup, LambdaConstructor, LifecycleControl, SingletonCache,
};
use di_impl::DefaultBeanFactory;
use infrastructure_common::{
    ApplicationSettings, BeanError, BeanInstance, BoxError, DisposableComponent,
    InfrastructureError, ManagedComponent,
};
use infrastructure_composition::{DefinitionSet, FactoryBootstrapper};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 测试组件
#[derive(Debug)]
struct Node {
    name: String,
    journal: Arc<Mutex<Vec<String>>>,
}

impl DisposableComponent for Node {
    fn destroy(&self) -> Result<(), BoxError> {
        self.journal.lock().push(self.name.clone());
        Ok(())
    }
}

impl ManagedComponent for Node {
    fn as_disposable(&self) -> Option<&dyn DisposableComponent> {
        Some(self)
    }
}

fn node_constructor(
    journal: Arc<Mutex<Vec<String>>>,
    created: Arc<AtomicUsize>,
) -> Arc<dyn BeanConstructor> {
    Arc::new(LambdaConstructor::new(move |name, _definition, _factory| {
        created.fetch_add(1, Ordering::SeqCst);
        let instance: BeanInstance = Arc::new(Node {
            name: name.to_string(),
            journal: Arc::clone(&journal),
        });
        Ok(instance)
    }))
}

fn journal() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

#[test]
fn test_three_level_hierarchy_merges_across_factories() -> anyhow::Result<()> {
    let root = Arc::new(DefaultBeanFactory::new());
    root.register_bean_definition(
        "template",
        BeanDefinition::new()
            .with_abstract(true)
            .with_property("timeout", json!(30))
            .with_property("retries", json!(1)),
    )?;

    let middle = Arc::new(DefaultBeanFactory::new());
    middle.set_parent_bean_factory(root.clone())?;
    middle.register_bean_definition(
        "client",
        BeanDefinition::child_of("template").with_property("retries", json!(3)),
    )?;

    let leaf = DefaultBeanFactory::new();
    leaf.set_parent_bean_factory(middle.clone())?;
    leaf.register_bean_definition(
        "client",
        BeanDefinition::child_of("client").with_property("endpoint", json!("http://leaf")),
    )?;

    let merged = leaf.get_merged_bean_definition("client")?;
    assert_eq!(merged.property_values["timeout"], json!(30));
    assert_eq!(merged.property_values["retries"], json!(3));
    assert_eq!(merged.property_values["endpoint"], json!("http://leaf"));
    assert!(!merged.is_abstract);

    assert!(leaf.contains_local_bean("client"));
    assert!(!leaf.contains_local_bean("template"));
    assert!(leaf.contains_bean("template"));
    Ok(())
}

#[test]
fn test_parent_link_cannot_form_a_cycle() -> anyhow::Result<()> {
    let parent = Arc::new(DefaultBeanFactory::new());
    let child = Arc::new(DefaultBeanFactory::new());
    child.set_parent_bean_factory(parent.clone())?;

    let result = parent.set_parent_bean_factory(child.clone());
    assert!(matches!(result, Err(BeanError::IllegalState { .. })));
    assert!(parent.get_parent_bean_factory().is_none());
    Ok(())
}

#[test]
fn test_bootstrap_then_shutdown_destroys_in_dependency_order() -> anyhow::Result<()> {
    let journal = journal();
    let bootstrapped = FactoryBootstrapper::new()
        .with_settings(ApplicationSettings::default())
        .with_constructor(node_constructor(Arc::clone(&journal), Arc::new(AtomicUsize::new(0))))
        .add_definition_source(
            DefinitionSet::new("app")
                .definition("controller", BeanDefinition::new().with_depends_on(["service"]))
                .definition("service", BeanDefinition::new().with_depends_on(["repository"]))
                .definition("repository", BeanDefinition::new()),
        )
        .build()?;

    let factory = bootstrapped.factory();
    assert_eq!(
        factory.get_singleton_names(),
        vec!["repository", "service", "controller"]
    );
    assert_eq!(factory.get_dependent_beans("service"), vec!["controller"]);
    assert!(factory.is_dependent("repository", "controller"));

    bootstrapped.shutdown()?;
    assert_eq!(*journal.lock(), vec!["controller", "service", "repository"]);
    Ok(())
}

#[test]
fn test_replacing_definition_destroys_created_singleton_and_dependents() -> anyhow::Result<()> {
    let journal = journal();
    let factory = DefaultBeanFactory::new();
    factory.set_bean_constructor(node_constructor(Arc::clone(&journal), Arc::new(AtomicUsize::new(0))));
    factory.register_bean_definition("pool", BeanDefinition::new())?;
    factory.register_bean_definition("dao", BeanDefinition::new().with_depends_on(["pool"]))?;
    factory.register_bean_definition("unrelated", BeanDefinition::new())?;
    factory.pre_instantiate_singletons()?;

    factory.register_bean_definition(
        "pool",
        BeanDefinition::new().with_property("size", json!(16)),
    )?;

    assert_eq!(*journal.lock(), vec!["dao", "pool"]);
    assert!(!factory.contains_singleton("pool"));
    assert!(!factory.contains_singleton("dao"));
    assert!(factory.contains_singleton("unrelated"));

    let pool = factory.get_bean_as::<Node>("pool")?;
    assert_eq!(pool.name, "pool");
    Ok(())
}

#[test]
fn test_bootstrap_fails_on_unresolvable_parent() {
    let result = FactoryBootstrapper::new()
        .with_settings(ApplicationSettings::default())
        .with_constructor(node_constructor(journal(), Arc::new(AtomicUsize::new(0))))
        .add_definition_source(
            DefinitionSet::new("app").definition("orphan", BeanDefinition::child_of("missing")),
        )
        .build();

    assert!(matches!(
        result,
        Err(InfrastructureError::BeanError {
            source: BeanError::DefinitionStore { .. }
        })
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_children_share_parent_singleton() -> anyhow::Result<()> {
    let created = Arc::new(AtomicUsize::new(0));
    let parent = FactoryBootstrapper::new()
        .with_settings(ApplicationSettings::default())
        .with_constructor(node_constructor(journal(), Arc::clone(&created)))
        .add_definition_source(DefinitionSet::new("shared").definition(
            "registry",
            BeanDefinition::new().with_lazy_init(true),
        ))
        .build()?;

    let mut handles = Vec::new();
    for index in 0..6 {
        let child = FactoryBootstrapper::new()
            .with_settings(ApplicationSettings::default())
            .with_parent(parent.factory().clone())
            .pre_instantiate(false)
            .build()?;
        handles.push(tokio::task::spawn_blocking(move || {
            let instance = child.factory().get_bean("registry")?;
            Ok::<_, BeanError>((index, instance))
        }));
    }

    let mut instances = Vec::new();
    for handle in handles {
        let (_, instance) = handle.await??;
        instances.push(instance);
    }

    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert!(instances.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    parent.shutdown()?;
    Ok(())
}
