use crate::lookup_key::MAX_DEPTH;
use crate::rule::Rule;
use std::ops::Index;
use std::sync::Arc;

/// Rules resolved for one lookup key, indexed by depth.
///
/// A slot is empty when its level was not requested, carried no data, or
/// failed to resolve.
#[derive(Debug, Clone, Default)]
pub struct RuleHierarchy {
    levels: [Option<Arc<Rule>>; MAX_DEPTH],
}

impl RuleHierarchy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, depth: usize) -> Option<&Rule> {
        self.levels.get(depth).and_then(Option::as_deref)
    }

    /// Shared handle to the rule at `depth`, for callers that keep it past the callback.
    #[must_use]
    pub fn shared(&self, depth: usize) -> Option<Arc<Rule>> {
        self.levels.get(depth).and_then(Clone::clone)
    }

    /// Fills the slot at `depth`. Depths outside the hierarchy are ignored.
    pub fn set(&mut self, depth: usize, rule: Option<Arc<Rule>>) {
        if let Some(slot) = self.levels.get_mut(depth) {
            *slot = rule;
        }
    }

    /// Deepest populated rule.
    #[must_use]
    pub fn deepest(&self) -> Option<&Rule> {
        self.levels.iter().rev().find_map(Option::as_deref)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&Rule>> {
        self.levels.iter().map(Option::as_deref)
    }
}

impl Index<usize> for RuleHierarchy {
    type Output = Option<Arc<Rule>>;

    fn index(&self, depth: usize) -> &Self::Output {
        &self.levels[depth]
    }
}
