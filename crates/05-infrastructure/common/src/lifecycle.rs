//! 工厂配置生命周期状态

use std::fmt;

/// 工厂配置状态
///
/// 状态只能从 `Open` 单向迁移到 `Frozen`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConfigurationState {
    /// 可继续注册、替换和移除定义
    #[default]
    Open,
    /// 定义元数据不再变化
    Frozen,
}

impl ConfigurationState {
    /// 是否已冻结
    pub fn is_frozen(self) -> bool {
        matches!(self, Self::Frozen)
    }
}

impl fmt::Display for ConfigurationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("OPEN"),
            Self::Frozen => f.write_str("FROZEN"),
        }
    }
}
