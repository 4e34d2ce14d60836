//! 默认的自动装配候选判断

use di_abstractions::{AutowireCandidateResolver, MergedBeanDefinition};
use infrastructure_common::TypeInfo;

/// 按定义标记与目标类型判断候选者
///
/// 定义未声明类型时只看 `autowire_candidate` 标记。
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeMatchingCandidateResolver;

impl AutowireCandidateResolver for TypeMatchingCandidateResolver {
    fn is_autowire_candidate(&self, definition: &MergedBeanDefinition, required: &TypeInfo) -> bool {
        definition.autowire_candidate
            && definition
                .bean_type
                .as_ref()
                .map_or(true, |bean_type| bean_type.matches(required))
    }
}
