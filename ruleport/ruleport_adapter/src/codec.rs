//! Rule records.
//!
//! A [`RuleRecord`] is the stored form of one rule: the rule type plus six
//! positional value slots, addressed by [`policy_id`]. Records convert to and
//! from store documents and render back into policy lines.

use std::fmt;

use ruleport_core::error::{AdapterError, Result};
use ruleport_docstore::{Document, DocumentSnapshot};
use serde_json::Value;
use tracing::warn;

use crate::hash::policy_id;

/// Number of value slots in a record.
pub const MAX_FIELDS: usize = 6;

/// Separator between tokens of a rendered policy line.
const LINE_SEPARATOR: &str = ", ";

/// Names of the value slots as stored.
pub const FIELD_NAMES: [&str; MAX_FIELDS] = ["v0", "v1", "v2", "v3", "v4", "v5"];

/// Stored field holding the rule type.
pub const PTYPE_FIELD: &str = "pType";

/// Stored field holding the record identifier.
pub const ID_FIELD: &str = "id";

/// The stored form of one rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleRecord {
    /// Content hash of the rule.
    pub id: String,

    /// Rule type, e.g. `p` or `g2`. Stored as `pType`.
    pub ptype: String,

    pub v0: String,
    pub v1: String,
    pub v2: String,
    pub v3: String,
    pub v4: String,
    pub v5: String,
}

impl RuleRecord {
    /// Build the record for `rule` stored under `ptype`.
    ///
    /// Unused slots are left empty. Values past the sixth are not stored but
    /// still take part in the identifier.
    pub fn encode(ptype: &str, rule: &[String]) -> Self {
        if rule.len() > MAX_FIELDS {
            warn!(
                ptype,
                fields = rule.len(),
                "rule has more than {} values, extra values are not stored",
                MAX_FIELDS
            );
        }

        let mut record = RuleRecord {
            id: policy_id(ptype, rule),
            ptype: ptype.to_string(),
            ..Default::default()
        };
        for (slot, value) in record.slots_mut().into_iter().zip(rule) {
            *slot = value.clone();
        }
        record
    }

    /// The six value slots in order.
    pub fn values(&self) -> [&str; MAX_FIELDS] {
        [&self.v0, &self.v1, &self.v2, &self.v3, &self.v4, &self.v5]
    }

    fn slots_mut(&mut self) -> [&mut String; MAX_FIELDS] {
        [
            &mut self.v0,
            &mut self.v1,
            &mut self.v2,
            &mut self.v3,
            &mut self.v4,
            &mut self.v5,
        ]
    }

    /// Render the record as a policy line.
    ///
    /// The type comes first, then every non-empty slot in order. An empty
    /// slot is skipped without ending the line, so `v0 = "", v1 = "x"`
    /// renders as `p, x`.
    pub fn to_line(&self) -> String {
        let values = self.values();
        let capacity = values
            .iter()
            .map(|v| v.len() + LINE_SEPARATOR.len())
            .sum::<usize>();
        let mut line = String::with_capacity(self.ptype.len() + capacity);

        line.push_str(&self.ptype);
        for value in values.iter().filter(|v| !v.is_empty()) {
            line.push_str(LINE_SEPARATOR);
            line.push_str(value);
        }
        line
    }

    /// Convert to a store document.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert(ID_FIELD.to_string(), Value::String(self.id.clone()));
        doc.insert(PTYPE_FIELD.to_string(), Value::String(self.ptype.clone()));
        for (name, value) in FIELD_NAMES.iter().zip(self.values()) {
            doc.insert(name.to_string(), Value::String(value.to_string()));
        }
        doc
    }

    /// Decode a store document.
    ///
    /// A missing `id` field falls back to `doc_id`; missing slots decode as
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::Decode` when the type is missing or empty, or
    /// when a field holds something other than a string.
    pub fn from_document(doc_id: &str, document: &Document) -> Result<Self> {
        let decode_err = |reason: String| AdapterError::Decode {
            id: doc_id.to_string(),
            reason,
        };

        let text = |field: &str| -> std::result::Result<Option<String>, AdapterError> {
            match document.get(field) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(s)) => Ok(Some(s.clone())),
                Some(other) => Err(decode_err(format!(
                    "field `{}` is not a string: {}",
                    field, other
                ))),
            }
        };

        let ptype = text(PTYPE_FIELD)?
            .filter(|p| !p.is_empty())
            .ok_or_else(|| decode_err(format!("missing `{}`", PTYPE_FIELD)))?;

        let mut record = RuleRecord {
            id: text(ID_FIELD)?.unwrap_or_else(|| doc_id.to_string()),
            ptype,
            ..Default::default()
        };
        for (name, slot) in FIELD_NAMES.into_iter().zip(record.slots_mut()) {
            *slot = text(name)?.unwrap_or_default();
        }
        Ok(record)
    }

    /// Decode a query result.
    pub fn from_snapshot(snapshot: &DocumentSnapshot) -> Result<Self> {
        Self::from_document(&snapshot.id, &snapshot.data)
    }
}

impl fmt::Display for RuleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruleport_core::Error;
    use serde_json::json;

    fn rule(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_encode_fills_slots() {
        let record = RuleRecord::encode("p", &rule(&["alice", "data1", "read"]));
        assert_eq!(record.ptype, "p");
        assert_eq!(record.v0, "alice");
        assert_eq!(record.v1, "data1");
        assert_eq!(record.v2, "read");
        assert_eq!(record.v3, "");
        assert_eq!(record.v4, "");
        assert_eq!(record.v5, "");
        assert_eq!(record.id, policy_id("p", &rule(&["alice", "data1", "read"])));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let a = RuleRecord::encode("g", &rule(&["alice", "admin"]));
        let b = RuleRecord::encode("g", &rule(&["alice", "admin"]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_encode_truncates_but_hashes_all() {
        let long = rule(&["a", "b", "c", "d", "e", "f", "g"]);
        let record = RuleRecord::encode("p", &long);
        assert_eq!(record.v5, "f");
        assert_eq!(record.id, policy_id("p", &long));
        assert_ne!(record.id, policy_id("p", &long[..6]));
    }

    #[test]
    fn test_line_rendering() {
        let record = RuleRecord::encode("p", &rule(&["alice", "data1", "read"]));
        assert_eq!(record.to_line(), "p, alice, data1, read");
        assert_eq!(record.to_string(), "p, alice, data1, read");
    }

    #[test]
    fn test_line_skips_gaps_without_stopping() {
        let record = RuleRecord::encode("p", &rule(&["", "data1", "", "read"]));
        assert_eq!(record.to_line(), "p, data1, read");
    }

    #[test]
    fn test_line_of_bare_type() {
        assert_eq!(RuleRecord::encode("p", &[]).to_line(), "p");
    }

    #[test]
    fn test_document_shape() {
        let record = RuleRecord::encode("p", &rule(&["alice", "data1", "read"]));
        let doc = record.to_document();

        let expected = json!({
            "id": record.id,
            "pType": "p",
            "v0": "alice",
            "v1": "data1",
            "v2": "read",
            "v3": "",
            "v4": "",
            "v5": "",
        });
        assert_eq!(serde_json::Value::Object(doc.clone()), expected);

        let decoded = RuleRecord::from_document(&record.id, &doc).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_decode_tolerates_missing_slots_and_id() {
        let doc = json!({ "pType": "g", "v0": "alice", "v1": "admin" })
            .as_object()
            .cloned()
            .unwrap();
        let record = RuleRecord::from_document("doc-key", &doc).unwrap();
        assert_eq!(record.id, "doc-key");
        assert_eq!(record.v2, "");
        assert_eq!(record.to_line(), "g, alice, admin");
    }

    #[test]
    fn test_decode_rejects_missing_type() {
        let doc = json!({ "v0": "alice" }).as_object().cloned().unwrap();
        let err = RuleRecord::from_document("x", &doc).unwrap_err();
        assert!(matches!(
            err,
            Error::Adapter(AdapterError::Decode { ref id, .. }) if id == "x"
        ));

        let doc = json!({ "pType": "" }).as_object().cloned().unwrap();
        assert!(RuleRecord::from_document("x", &doc).is_err());
    }

    #[test]
    fn test_decode_rejects_non_string_field() {
        let doc = json!({ "pType": "p", "v1": 42 }).as_object().cloned().unwrap();
        let err = RuleRecord::from_document("x", &doc).unwrap_err();
        assert!(err.to_string().contains("`v1` is not a string"));
    }
}
