//! Ordered collection of suites and selection of the methods to run.

use crate::case::{MethodInfo, Suite};

/// Registered suites, in registration order.
#[derive(Default)]
pub struct Registry {
    suites: Vec<Box<dyn Suite>>,
}

/// One method chosen for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selected {
    /// Position of the suite in the registry.
    pub suite: usize,
    /// Position of the method inside its suite.
    pub index: usize,
    pub info: MethodInfo,
}

/// A `Case`, `Case::method` or `Case.method` selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub case: String,
    pub method: Option<String>,
}

impl Scope {
    pub fn parse(text: &str) -> Self {
        let split = text.split_once("::").or_else(|| text.split_once('.'));
        match split {
            Some((case, method)) if !method.is_empty() => Self {
                case: case.to_string(),
                method: Some(method.to_string()),
            },
            Some((case, _)) => Self {
                case: case.to_string(),
                method: None,
            },
            None => Self {
                case: text.to_string(),
                method: None,
            },
        }
    }

    pub fn matches(&self, case: &str, method: &str) -> bool {
        self.case == case && self.method.as_deref().is_none_or(|m| m == method)
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a suite. A name already in use is kept but logged, since selectors then match both.
    pub fn register(&mut self, suite: impl Suite + 'static) -> &mut Self {
        if self.get(suite.name()).is_some() {
            tracing::warn!(case = suite.name(), "a suite with this name is already registered");
        }
        self.suites.push(Box::new(suite));
        self
    }

    /// Builder form of [`Registry::register`].
    pub fn with(mut self, suite: impl Suite + 'static) -> Self {
        self.register(suite);
        self
    }

    pub fn suites(&self) -> &[Box<dyn Suite>] {
        &self.suites
    }

    pub fn get(&self, name: &str) -> Option<&dyn Suite> {
        self.suites
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.suites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }

    /// Methods matching any of `scopes` (all methods when empty) whose `Case::method` path
    /// contains `keyword`, in registration then declaration order.
    pub fn select(&self, scopes: &[Scope], keyword: Option<&str>) -> Vec<Selected> {
        let mut selected = Vec::new();
        for (suite_index, suite) in self.suites.iter().enumerate() {
            for (index, info) in suite.methods().into_iter().enumerate() {
                let in_scope = scopes.is_empty() || scopes.iter().any(|s| s.matches(suite.name(), &info.name));
                let path = format!("{}::{}", suite.name(), info.name);
                let keyword_hit = keyword.is_none_or(|k| path.contains(k));
                if in_scope && keyword_hit {
                    selected.push(Selected {
                        suite: suite_index,
                        index,
                        info,
                    });
                }
            }
        }
        selected
    }

    /// Selectors naming a case that is not registered.
    pub fn unknown_scopes<'a>(&self, scopes: &'a [Scope]) -> Vec<&'a Scope> {
        scopes
            .iter()
            .filter(|s| self.get(&s.case).is_none())
            .collect()
    }
}
