//! Policy assertions.

/// One named definition inside a model section, e.g. `p = sub, obj, act`.
///
/// For `p` and `g` sections the assertion also holds the rules loaded for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assertion {
    /// The assertion key, e.g. `p` or `g2`.
    pub key: String,

    /// The raw definition text.
    pub value: String,

    /// The rules stored under this assertion, in load order.
    pub policy: Vec<Vec<String>>,
}

impl Assertion {
    /// Create an assertion with no rules.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            policy: Vec::new(),
        }
    }

    /// Whether `rule` is already present.
    pub fn contains(&self, rule: &[String]) -> bool {
        self.policy.iter().any(|r| r.as_slice() == rule)
    }
}
