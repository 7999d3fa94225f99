//! Feature-availability flags and the declarative visibility rules that
//! read them.
//!
//! Group membership is filtered through [`VisibilityRule`]s evaluated
//! against a [`FeatureFlags`] set. Rules are data, not closures, so the
//! visible subsequence of a group is a pure function of the flag values.

use std::collections::BTreeMap;

/// Named boolean flags describing which hardware features are present or
/// enabled (`gpu.vendor.amd`, `amd.rsr.enabled`, ...). Unknown flags read
/// as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    values: BTreeMap<String, bool>,
    generation: u64,
}

impl FeatureFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> bool {
        self.values.get(name).copied().unwrap_or(false)
    }

    /// Sets `name` and returns whether the stored value changed.
    pub fn set(&mut self, name: &str, value: bool) -> bool {
        let previous = self.values.insert(name.to_owned(), value);
        let changed = previous.unwrap_or(false) != value;
        if changed {
            self.generation += 1;
        }
        changed
    }

    /// Counter bumped on every effective change; lets callers detect that a
    /// callback touched visibility without diffing the whole set.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for FeatureFlags {
    fn from_iter<T: IntoIterator<Item = (S, bool)>>(iter: T) -> Self {
        let mut flags = FeatureFlags::new();
        flags.extend(iter);
        flags
    }
}

impl<S: Into<String>> Extend<(S, bool)> for FeatureFlags {
    fn extend<T: IntoIterator<Item = (S, bool)>>(&mut self, iter: T) {
        for (name, value) in iter {
            let name = name.into();
            self.set(&name, value);
        }
    }
}

/// Predicate deciding whether a group entry currently occupies an index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VisibilityRule {
    #[default]
    Always,
    Flag(String),
    Not(Box<VisibilityRule>),
    All(Vec<VisibilityRule>),
    Any(Vec<VisibilityRule>),
}

impl VisibilityRule {
    pub fn flag(name: impl Into<String>) -> Self {
        VisibilityRule::Flag(name.into())
    }

    pub fn all_flags<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        VisibilityRule::All(names.into_iter().map(VisibilityRule::flag).collect())
    }

    pub fn negate(self) -> Self {
        VisibilityRule::Not(Box::new(self))
    }

    pub fn evaluate(&self, flags: &FeatureFlags) -> bool {
        match self {
            VisibilityRule::Always => true,
            VisibilityRule::Flag(name) => flags.get(name),
            VisibilityRule::Not(rule) => !rule.evaluate(flags),
            VisibilityRule::All(rules) => rules.iter().all(|rule| rule.evaluate(flags)),
            VisibilityRule::Any(rules) => rules.iter().any(|rule| rule.evaluate(flags)),
        }
    }
}
