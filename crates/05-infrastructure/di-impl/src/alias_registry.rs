//! 别名注册表实现

use di_abstractions::StringValueResolver;
use indexmap::IndexMap;
use infrastructure_common::{BeanError, BeanResult};
use parking_lot::RwLock;
use tracing::debug;

/// 简单别名注册表
///
/// 保存 别名 -> 名称 的映射，按注册顺序迭代。
#[derive(Debug, Default)]
pub struct SimpleAliasRegistry {
    aliases: RwLock<IndexMap<String, String>>,
}

impl SimpleAliasRegistry {
    /// 创建新的别名注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册别名
    pub fn register_alias(&self, name: &str, alias: &str, allow_overriding: bool) -> BeanResult<()> {
        if name.trim().is_empty() || alias.trim().is_empty() {
            return Err(BeanError::illegal_argument("名称和别名都不能为空"));
        }

        let mut aliases = self.aliases.write();
        if alias == name {
            if aliases.shift_remove(alias).is_some() {
                debug!("别名 '{}' 指向自身，已移除", alias);
            }
            return Ok(());
        }

        if let Some(registered) = aliases.get(alias) {
            if registered == name {
                return Ok(());
            }
            if !allow_overriding {
                return Err(BeanError::illegal_state(format!(
                    "无法为名称 '{}' 注册别名 '{}': 该别名已注册给名称 '{}'",
                    name, alias, registered
                )));
            }
            debug!("覆盖别名 '{}': '{}' -> '{}'", alias, registered, name);
        }

        check_for_alias_circle(&aliases, name, alias)?;
        aliases.insert(alias.to_string(), name.to_string());
        debug!("注册别名 '{}' -> '{}'", alias, name);
        Ok(())
    }

    /// 移除别名
    pub fn remove_alias(&self, alias: &str) -> BeanResult<()> {
        match self.aliases.write().shift_remove(alias) {
            Some(_) => Ok(()),
            None => Err(BeanError::illegal_state(format!("没有注册别名 '{}'", alias))),
        }
    }

    /// 是否为别名
    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.read().contains_key(name)
    }

    /// 获取名称的所有别名（包括传递别名）
    pub fn get_aliases(&self, name: &str) -> Vec<String> {
        let aliases = self.aliases.read();
        let mut result = Vec::new();
        retrieve_aliases(&aliases, name, &mut result);
        result
    }

    /// 解析规范名称
    pub fn canonical_name(&self, name: &str) -> String {
        let aliases = self.aliases.read();
        let mut canonical = name;
        // 注册时保证无环，这里的上限只是防止外部破坏不变量
        for _ in 0..=aliases.len() {
            match aliases.get(canonical) {
                Some(resolved) => canonical = resolved,
                None => break,
            }
        }
        canonical.to_string()
    }

    /// 当前所有别名映射的拷贝
    pub fn entries(&self) -> Vec<(String, String)> {
        self.aliases
            .read()
            .iter()
            .map(|(alias, name)| (alias.clone(), name.clone()))
            .collect()
    }

    /// 使用解析器重写所有别名
    ///
    /// 在副本上完成全部重写，只有全部成功才替换原映射。
    pub fn resolve_aliases(&self, resolver: &dyn StringValueResolver) -> BeanResult<()> {
        let mut aliases = self.aliases.write();
        let mut working = aliases.clone();

        for (alias, registered_name) in aliases.iter() {
            let resolved_alias = resolver.resolve_string_value(alias);
            let resolved_name = resolver.resolve_string_value(registered_name);

            let (resolved_alias, resolved_name) = match (resolved_alias, resolved_name) {
                (Some(a), Some(n)) if a != n => (a, n),
                _ => {
                    working.shift_remove(alias);
                    continue;
                }
            };

            if resolved_alias != *alias {
                if let Some(existing) = working.get(&resolved_alias) {
                    if *existing == resolved_name {
                        working.shift_remove(alias);
                        continue;
                    }
                    return Err(BeanError::illegal_state(format!(
                        "解析后的别名 '{}'（原别名 '{}'）已注册给名称 '{}'，无法改指向 '{}'",
                        resolved_alias, alias, existing, resolved_name
                    )));
                }
                check_for_alias_circle(&working, &resolved_name, &resolved_alias)?;
                working.shift_remove(alias);
                working.insert(resolved_alias, resolved_name);
            } else if *registered_name != resolved_name {
                working.insert(alias.clone(), resolved_name);
            }
        }

        *aliases = working;
        Ok(())
    }
}

/// `alias` 是否（传递地）为 `name` 的别名
fn has_alias(aliases: &IndexMap<String, String>, name: &str, alias: &str) -> bool {
    aliases.iter().any(|(registered_alias, registered_name)| {
        registered_name == name
            && (registered_alias == alias || has_alias(aliases, registered_alias, alias))
    })
}

fn check_for_alias_circle(
    aliases: &IndexMap<String, String>,
    name: &str,
    alias: &str,
) -> BeanResult<()> {
    if has_alias(aliases, alias, name) {
        return Err(BeanError::illegal_state(format!(
            "无法为名称 '{}' 注册别名 '{}': 检测到循环引用，'{}' 已经是 '{}' 的（传递）别名",
            name, alias, name, alias
        )));
    }
    Ok(())
}

fn retrieve_aliases(aliases: &IndexMap<String, String>, name: &str, result: &mut Vec<String>) {
    for (alias, registered_name) in aliases {
        if registered_name == name {
            result.push(alias.clone());
            retrieve_aliases(aliases, alias, result);
        }
    }
}
