//! Sub-case labels.
//!
//! A label is an ordered list of descriptive `key=value` pairs identifying one variant of a test
//! body, rendered the way unittest renders `subTest` parameters: `(a=2, b=3)`.

use std::fmt;

/// Ordered key/value pairs naming a sub-case.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Label {
    pairs: Vec<(String, String)>,
}

impl Label {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair. The value is stored in its `Display` form.
    pub fn with(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    /// Append every pair of `inner` after this label's pairs.
    ///
    /// ## Notes
    /// - Used for nested sub-cases: the outer label always comes first.
    pub fn merged(&self, inner: &Label) -> Label {
        let mut pairs = self.pairs.clone();
        pairs.extend(inner.pairs.iter().cloned());
        Label { pairs }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Look up the value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        f.write_str(")")
    }
}

impl<K: Into<String>, V: fmt::Display> FromIterator<(K, V)> for Label {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Label::new(), |label, (k, v)| label.with(k, v))
    }
}

/// Build a [`Label`] from `key = value` pairs.
///
/// ```rust
/// use tally_core::label;
///
/// let (a, b) = (2, 3);
/// assert_eq!(label!(a = a, b = b).to_string(), "(a=2, b=3)");
/// ```
#[macro_export]
macro_rules! label {
    ($($key:ident = $value:expr),* $(,)?) => {
        $crate::label::Label::new()$(.with(stringify!($key), $value))*
    };
}
