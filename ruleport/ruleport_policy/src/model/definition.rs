//! The in-memory policy model.
//!
//! A model is a set of sections (`r`, `p`, `g`, `e`, `m`), each holding named
//! assertions. Only the `p` and `g` sections carry rules; the others are kept
//! so a model parsed from text round-trips its definitions.

use std::collections::BTreeMap;

use ruleport_core::error::{ModelError, Result};

use super::Assertion;

/// A minimal role-based access control model.
pub const BASIC_RBAC_MODEL: &str = r#"
[request_definition]
r = sub, obj, act

[policy_definition]
p = sub, obj, act

[role_definition]
g = _, _

[policy_effect]
e = some(where (p.eft == allow))

[matchers]
m = g(r.sub, p.sub) && r.obj == p.obj && r.act == p.act
"#;

/// Sections whose assertions carry rules.
pub const RULE_SECTIONS: [&str; 2] = ["p", "g"];

fn section_for_header(header: &str) -> Option<&'static str> {
    match header {
        "request_definition" => Some("r"),
        "policy_definition" => Some("p"),
        "role_definition" => Some("g"),
        "policy_effect" => Some("e"),
        "matchers" => Some("m"),
        _ => None,
    }
}

/// A policy model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    sections: BTreeMap<String, BTreeMap<String, Assertion>>,
}

impl Model {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse model text in the `[section]` / `key = value` format.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidDefinition` for an unknown section header,
    /// a definition outside any section, a line without `=`, or a key that
    /// does not start with its section letter.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut model = Model::new();
        let mut current: Option<&'static str> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                current = Some(section_for_header(header.trim()).ok_or_else(|| {
                    ModelError::InvalidDefinition {
                        line: line_no,
                        reason: format!("unknown section [{}]", header),
                    }
                })?);
                continue;
            }

            let sec = current.ok_or_else(|| ModelError::InvalidDefinition {
                line: line_no,
                reason: "definition outside of a section".to_string(),
            })?;

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| ModelError::InvalidDefinition {
                    line: line_no,
                    reason: format!("expected `key = value`, got `{}`", line),
                })?;
            let key = key.trim();

            if !key.starts_with(sec) {
                return Err(ModelError::InvalidDefinition {
                    line: line_no,
                    reason: format!("key `{}` does not belong to section `{}`", key, sec),
                }
                .into());
            }

            model.add_def(sec, key, value.trim());
        }

        Ok(model)
    }

    /// Add a definition. Returns `false` and leaves the model unchanged when
    /// `value` is empty.
    pub fn add_def(&mut self, sec: &str, key: &str, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }

        self.sections
            .entry(sec.to_string())
            .or_default()
            .insert(key.to_string(), Assertion::new(key, value));
        true
    }

    /// All assertions of a section, keyed by assertion key.
    pub fn section(&self, sec: &str) -> Option<&BTreeMap<String, Assertion>> {
        self.sections.get(sec)
    }

    /// Look up one assertion.
    pub fn get_assertion(&self, sec: &str, key: &str) -> Option<&Assertion> {
        self.sections.get(sec).and_then(|s| s.get(key))
    }

    /// Look up one assertion for modification.
    pub fn get_assertion_mut(&mut self, sec: &str, key: &str) -> Option<&mut Assertion> {
        self.sections.get_mut(sec).and_then(|s| s.get_mut(key))
    }

    /// Rules stored under `sec`/`ptype`; empty when the assertion is absent.
    pub fn get_policy(&self, sec: &str, ptype: &str) -> &[Vec<String>] {
        self.get_assertion(sec, ptype)
            .map(|a| a.policy.as_slice())
            .unwrap_or(&[])
    }

    /// Append a rule.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The rule was added.
    /// * `Ok(false)` - The rule was already present.
    /// * `Err` - The model has no such assertion.
    pub fn add_policy(&mut self, sec: &str, ptype: &str, rule: Vec<String>) -> Result<bool> {
        let assertion =
            self.get_assertion_mut(sec, ptype)
                .ok_or_else(|| ModelError::AssertionNotFound {
                    sec: sec.to_string(),
                    key: ptype.to_string(),
                })?;

        if assertion.contains(&rule) {
            return Ok(false);
        }

        assertion.policy.push(rule);
        Ok(true)
    }

    /// Number of rules across the `p` and `g` sections.
    pub fn policy_count(&self) -> usize {
        RULE_SECTIONS
            .iter()
            .filter_map(|sec| self.sections.get(*sec))
            .flat_map(|section| section.values())
            .map(|a| a.policy.len())
            .sum()
    }
}
