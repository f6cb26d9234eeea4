//! Storage adapter contract.
//!
//! The policy engine persists and restores its rule set through this trait.
//! Implementations decide how rules are stored; the engine only sees
//! models, rule tuples and the filtered flag.

use ruleport_core::error::Result;

use crate::model::Model;

/// Trait for policy storage adapters.
///
/// Loading takes `&mut self` because it records whether the last load was
/// filtered. Every other operation leaves the adapter state untouched.
pub trait Adapter {
    /// Filter accepted by [`Adapter::load_filtered_policy`].
    type Filter;

    /// Load every stored rule into the model.
    ///
    /// Clears the filtered flag on success.
    fn load_policy(&mut self, model: &mut Model) -> Result<()>;

    /// Load the rules selected by `filter` into the model.
    ///
    /// # Arguments
    ///
    /// * `model` - The model to populate.
    /// * `filter` - The selection; `None` behaves as [`Adapter::load_policy`].
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The selected rules were loaded and the adapter is now
    ///   filtered (unless `filter` was `None`).
    /// * `Err` - A store or decode failure; rules already loaded stay in the model.
    fn load_filtered_policy(&mut self, model: &mut Model, filter: Option<Self::Filter>)
        -> Result<()>;

    /// Replace the stored rule set with the `p` and `g` rules of the model.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Storage now holds exactly the model's rules.
    /// * `Err` - The adapter is filtered, or the store failed.
    fn save_policy(&self, model: &Model) -> Result<()>;

    /// Store one rule.
    ///
    /// # Arguments
    ///
    /// * `sec` - The model section, `p` or `g`.
    /// * `ptype` - The rule type, e.g. `p` or `g2`.
    /// * `rule` - The rule values.
    fn add_policy(&self, sec: &str, ptype: &str, rule: &[String]) -> Result<()>;

    /// Store several rules of one type.
    fn add_policies(&self, sec: &str, ptype: &str, rules: &[Vec<String>]) -> Result<()>;

    /// Remove one rule. Removing an absent rule is not an error.
    fn remove_policy(&self, sec: &str, ptype: &str, rule: &[String]) -> Result<()>;

    /// Remove rules of one type.
    fn remove_policies(&self, sec: &str, ptype: &str, rules: &[Vec<String>]) -> Result<()>;

    /// Remove the rules of `ptype` whose values match `field_values`.
    ///
    /// # Arguments
    ///
    /// * `sec` - The model section.
    /// * `ptype` - The rule type.
    /// * `field_index` - The value slot `field_values[0]` is matched against.
    /// * `field_values` - Values to match; an empty string matches anything.
    fn remove_filtered_policy(
        &self,
        sec: &str,
        ptype: &str,
        field_index: isize,
        field_values: &[String],
    ) -> Result<()>;

    /// Whether the last load was filtered.
    fn is_filtered(&self) -> bool;
}
