//! # 示例应用程序
//!
//! 演示如何使用 Lorn ADSP Bean 工厂：父子工厂、定义继承、别名、自定义作用域与有序销毁

use anyhow::{anyhow, Context};
use clap::Parser;
use di_abstractions::{
    AliasRegistry, BeanConstructor, BeanDefinition, BeanFactory, BeanFactoryExt, LambdaConstructor,
    LifecycleControl, SCOPE_PROTOTYPE,
};
use di_impl::InMemoryScope;
use infrastructure_common::{
    ApplicationSettings, BeanInstance, BoxError, DisposableComponent, ManagedComponent,
    SmartInitializingSingleton,
};
use infrastructure_composition::{BootstrappedFactory, DefinitionSet, FactoryBootstrapper};
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn ADSP Bean 工厂示例应用")]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = "config/factory.toml")]
    config: PathBuf,

    /// 日志级别，覆盖配置文件中的设置
    #[arg(long)]
    log_level: Option<String>,

    /// 是否输出 JSON 格式日志
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = ApplicationSettings::load(Some(args.config.as_path()))
        .with_context(|| format!("加载配置失败: {}", args.config.display()))?;
    if let Some(level) = args.log_level {
        settings.logging.level = level;
    }
    if args.json {
        settings.logging.json_format = true;
    }

    // 平台工厂：共享基础组件，日志在这里初始化
    let platform = FactoryBootstrapper::new()
        .with_settings(settings.clone())
        .with_logging(true)
        .with_constructor(platform_constructor())
        .add_definition_source(
            DefinitionSet::new("platform")
                .definition("clock", BeanDefinition::new().with_description("系统时钟"))
                .alias("clock", "systemClock"),
        )
        .build()
        .context("启动平台工厂失败")?;

    info!("启动 Lorn ADSP 示例应用");

    // 应用工厂：继承平台工厂
    let session = Arc::new(InMemoryScope::new("session"));
    let application = FactoryBootstrapper::new()
        .with_settings(settings)
        .with_parent(platform.factory().clone())
        .with_constructor(application_constructor())
        .add_scope("session", session.clone())
        .add_definition_source(application_definitions())
        .build()
        .context("启动应用工厂失败")?;

    demonstrate_lookup(&application)?;
    demonstrate_scopes(&application, &session)?;

    shutdown(&application, &platform)
}

fn application_definitions() -> DefinitionSet {
    DefinitionSet::new("application")
        .definition(
            "baseGreeter",
            BeanDefinition::new()
                .with_abstract(true)
                .with_property("greeting", json!("你好"))
                .with_depends_on(["audit"]),
        )
        .definition(
            "greeter",
            BeanDefinition::child_of("baseGreeter").with_property("target", json!("Lorn ADSP")),
        )
        .definition("audit", BeanDefinition::new())
        .definition("request", BeanDefinition::new().with_scope(SCOPE_PROTOTYPE))
        .definition("cart", BeanDefinition::new().with_scope("session"))
        .alias("greeter", "welcome")
}

fn demonstrate_lookup(application: &BootstrappedFactory) -> anyhow::Result<()> {
    info!("=== 演示定义继承与别名 ===");

    let factory = application.factory();
    let greeter = factory.get_bean_as::<Greeter>("welcome")?;
    info!("{}", greeter.greet());
    info!("greeter 的别名: {:?}", factory.get_aliases("greeter"));

    let clock = factory.get_bean_as::<SystemClock>("systemClock")?;
    info!("时钟来自平台工厂，已运行 {:?}", clock.started_at.elapsed());

    let first = factory.get_bean("request")?;
    let second = factory.get_bean("request")?;
    info!("原型 Bean 每次查找都是新实例: {}", !Arc::ptr_eq(&first, &second));
    factory.destroy_bean("request", first)?;
    Ok(())
}

fn demonstrate_scopes(
    application: &BootstrappedFactory,
    session: &InMemoryScope,
) -> anyhow::Result<()> {
    info!("=== 演示自定义作用域 ===");

    let factory = application.factory();
    let cart = factory.get_bean_as::<Cart>("cart")?;
    cart.items.fetch_add(2, Ordering::SeqCst);
    let same = factory.get_bean_as::<Cart>("cart")?;
    info!("同一会话中的购物车商品数: {}", same.items.load(Ordering::SeqCst));

    session
        .clear()
        .map_err(|failures| anyhow!("会话结束时 {} 个 Bean 销毁失败", failures.len()))?;
    let fresh = factory.get_bean_as::<Cart>("cart")?;
    info!("会话结束后的新购物车商品数: {}", fresh.items.load(Ordering::SeqCst));
    Ok(())
}

fn shutdown(application: &BootstrappedFactory, platform: &BootstrappedFactory) -> anyhow::Result<()> {
    info!("正在关闭应用");

    let mut result = Ok(());
    for bootstrapped in [application, platform] {
        if let Err(e) = bootstrapped.shutdown() {
            error!("关闭工厂失败: {}", e);
            result = Err(e.into());
        }
    }
    result
}

fn platform_constructor() -> Arc<dyn BeanConstructor> {
    Arc::new(LambdaConstructor::new(|name, _definition, _factory| {
        let instance: BeanInstance = match name {
            "clock" => Arc::new(SystemClock {
                started_at: Instant::now(),
            }),
            other => return Err(format!("平台工厂不认识 Bean '{}'", other).into()),
        };
        Ok(instance)
    }))
}

fn application_constructor() -> Arc<dyn BeanConstructor> {
    Arc::new(LambdaConstructor::new(|name, definition, factory| {
        let instance: BeanInstance = match name {
            "greeter" => Arc::new(Greeter {
                greeting: string_property(definition.property_values.get("greeting")),
                target: string_property(definition.property_values.get("target")),
                clock: factory.get_bean_as::<SystemClock>("clock")?,
            }),
            "audit" => Arc::new(AuditLog::default()),
            "request" => Arc::new(RequestContext),
            "cart" => Arc::new(Cart::default()),
            other => return Err(format!("应用工厂不认识 Bean '{}'", other).into()),
        };
        Ok(instance)
    }))
}

fn string_property(value: Option<&serde_json::Value>) -> String {
    value
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// 示例组件

/// 系统时钟
#[derive(Debug)]
struct SystemClock {
    started_at: Instant,
}

impl ManagedComponent for SystemClock {}

/// 问候服务
#[derive(Debug)]
struct Greeter {
    greeting: String,
    target: String,
    clock: Arc<SystemClock>,
}

impl Greeter {
    fn greet(&self) -> String {
        format!(
            "{}, {}! (启动于 {:?} 之前)",
            self.greeting,
            self.target,
            self.clock.started_at.elapsed()
        )
    }
}

impl DisposableComponent for Greeter {
    fn destroy(&self) -> Result<(), BoxError> {
        info!("关闭问候服务");
        Ok(())
    }
}

impl ManagedComponent for Greeter {
    fn as_disposable(&self) -> Option<&dyn DisposableComponent> {
        Some(self)
    }
}

/// 审计日志，所有单例创建完成后输出汇总
#[derive(Debug, Default)]
struct AuditLog {
    entries: AtomicUsize,
}

impl SmartInitializingSingleton for AuditLog {
    fn after_singletons_instantiated(&self) -> Result<(), BoxError> {
        self.entries.fetch_add(1, Ordering::SeqCst);
        info!("所有单例已创建，审计日志就绪");
        Ok(())
    }
}

impl DisposableComponent for AuditLog {
    fn destroy(&self) -> Result<(), BoxError> {
        info!("关闭审计日志，共 {} 条记录", self.entries.load(Ordering::SeqCst));
        Ok(())
    }
}

impl ManagedComponent for AuditLog {
    fn as_disposable(&self) -> Option<&dyn DisposableComponent> {
        Some(self)
    }

    fn as_smart_initializing(&self) -> Option<&dyn SmartInitializingSingleton> {
        Some(self)
    }
}

/// 请求上下文（原型）
#[derive(Debug)]
struct RequestContext;

impl ManagedComponent for RequestContext {}

/// 购物车（会话作用域）
#[derive(Debug, Default)]
struct Cart {
    items: AtomicUsize,
}

impl DisposableComponent for Cart {
    fn destroy(&self) -> Result<(), BoxError> {
        info!("会话结束，清空购物车");
        Ok(())
    }
}

impl ManagedComponent for Cart {
    fn as_disposable(&self) -> Option<&dyn DisposableComponent> {
        Some(self)
    }
}
