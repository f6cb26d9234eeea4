//! Rule filters.
//!
//! Two ways to select stored rules:
//!
//! - [`field_predicates`] turns the engine's field-index convention into
//!   equality predicates on the value slots.
//! - [`PolicyQuery`] lets callers build a selection for filtered loads
//!   without touching store query types.

use ruleport_core::error::{AdapterError, Result};
use ruleport_docstore::{FieldPredicate, Query};

use crate::codec::{FIELD_NAMES, ID_FIELD, MAX_FIELDS, PTYPE_FIELD};

/// Equality predicates for a field-index filter.
///
/// `field_values[0]` is matched against slot `field_index`, the next value
/// against the slot after it, and so on. For every slot `k` in `0..6` a
/// predicate `v{k} == field_values[k - field_index]` is produced when
/// `field_index <= k < field_index + field_values.len()` and the value is
/// non-empty. Empty values leave their slot unconstrained; with a negative
/// `field_index` the leading values fall before slot 0 and are ignored.
pub fn field_predicates(field_index: isize, field_values: &[String]) -> Vec<FieldPredicate> {
    let end = field_index.saturating_add(field_values.len() as isize);

    (0..MAX_FIELDS as isize)
        .filter(|&k| field_index <= k && k < end)
        .filter_map(|k| {
            let value = &field_values[(k - field_index) as usize];
            (!value.is_empty())
                .then(|| FieldPredicate::eq(FIELD_NAMES[k as usize], value.as_str()))
        })
        .collect()
}

/// A selection of stored rules, for [`DocumentAdapter::load_filtered_policy`].
///
/// All predicates must hold. Builder methods never fail; an invalid field
/// is reported when the query is bound to a collection.
///
/// ```
/// use ruleport_adapter::PolicyQuery;
///
/// let query = PolicyQuery::new().ptype("p").field(0, "alice");
/// assert_eq!(query.predicates().len(), 2);
/// ```
///
/// [`DocumentAdapter::load_filtered_policy`]: crate::DocumentAdapter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyQuery {
    predicates: Vec<FieldPredicate>,
    invalid: Option<String>,
}

impl PolicyQuery {
    /// A query selecting every rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// The rules of the field-index filter used by
    /// `remove_filtered_policy`, restricted to `ptype`.
    pub fn from_field_values(ptype: &str, field_index: isize, field_values: &[String]) -> Self {
        let mut query = Self::new().ptype(ptype);
        query
            .predicates
            .extend(field_predicates(field_index, field_values));
        query
    }

    /// Only rules of this type.
    pub fn ptype(self, ptype: &str) -> Self {
        self.where_eq(PTYPE_FIELD, ptype)
    }

    /// Only rules whose value slot `slot` equals `value`.
    pub fn field(mut self, slot: usize, value: &str) -> Self {
        match FIELD_NAMES.get(slot) {
            Some(name) => self.where_eq(name, value),
            None => {
                self.invalid
                    .get_or_insert_with(|| format!("no value slot {}", slot));
                self
            }
        }
    }

    /// Only rules whose stored field `field` equals `value`.
    ///
    /// `field` must be one of `id`, `pType` or `v0`..`v5`.
    pub fn where_eq(mut self, field: &str, value: &str) -> Self {
        let known = field == ID_FIELD
            || field == PTYPE_FIELD
            || FIELD_NAMES.iter().any(|name| *name == field);
        if known {
            self.predicates.push(FieldPredicate::eq(field, value));
        } else {
            self.invalid
                .get_or_insert_with(|| format!("unknown field `{}`", field));
        }
        self
    }

    /// The predicates added so far.
    pub fn predicates(&self) -> &[FieldPredicate] {
        &self.predicates
    }

    /// Bind the selection to a collection.
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::InvalidQuery` if any builder call named a field
    /// records do not have.
    pub fn to_query(&self, collection: &str) -> Result<Query> {
        if let Some(reason) = &self.invalid {
            return Err(AdapterError::InvalidQuery(reason.clone()).into());
        }

        Ok(self
            .predicates
            .iter()
            .cloned()
            .fold(Query::collection(collection), Query::with_predicate))
    }
}
