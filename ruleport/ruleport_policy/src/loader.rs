//! Policy line loading.
//!
//! A policy line is the text form of one rule: the assertion key followed by
//! the rule values, comma separated. Storage adapters render their records to
//! lines and hand them to [`load_policy_line`].

use ruleport_core::error::{ModelError, Result};
use tracing::trace;

use crate::model::Model;

/// Split a policy line into trimmed tokens.
fn tokenize(line: &str) -> Vec<String> {
    line.split(',').map(|t| t.trim().to_string()).collect()
}

/// Load one policy line into `model`.
///
/// Empty lines and lines starting with `#` are ignored. The first token is
/// the assertion key and its first character the section. A rule already in
/// the model is not added twice.
///
/// # Errors
///
/// Returns `ModelError::AssertionNotFound` if the model does not define the
/// line's assertion.
pub fn load_policy_line(line: &str, model: &mut Model) -> Result<()> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(());
    }

    let mut tokens = tokenize(line);
    let key = tokens.remove(0);
    let sec = match key.chars().next() {
        Some(c) => c.to_string(),
        None => {
            return Err(ModelError::AssertionNotFound {
                sec: String::new(),
                key,
            }
            .into())
        }
    };

    trace!(sec = %sec, key = %key, "loading policy line");
    model.add_policy(&sec, &key, tokens)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BASIC_RBAC_MODEL;
    use ruleport_core::Error;

    #[test]
    fn test_tokenize_trims() {
        assert_eq!(
            tokenize("p,  alice ,data1, read"),
            vec!["p", "alice", "data1", "read"]
        );
    }

    #[test]
    fn test_load_lines() {
        let mut model = Model::from_text(BASIC_RBAC_MODEL).unwrap();
        load_policy_line("p, alice, data1, read", &mut model).unwrap();
        load_policy_line("g, alice, admin", &mut model).unwrap();

        assert_eq!(
            model.get_policy("p", "p"),
            &[vec![
                "alice".to_string(),
                "data1".to_string(),
                "read".to_string()
            ]]
        );
        assert_eq!(model.get_policy("g", "g").len(), 1);
    }

    #[test]
    fn test_skips_blank_and_comment_lines() {
        let mut model = Model::from_text(BASIC_RBAC_MODEL).unwrap();
        load_policy_line("", &mut model).unwrap();
        load_policy_line("   ", &mut model).unwrap();
        load_policy_line("# p, alice, data1, read", &mut model).unwrap();
        assert_eq!(model.policy_count(), 0);
    }

    #[test]
    fn test_unknown_assertion() {
        let mut model = Model::from_text(BASIC_RBAC_MODEL).unwrap();
        let result = load_policy_line("p2, alice, data1, read", &mut model);
        assert!(matches!(
            result,
            Err(Error::Model(ModelError::AssertionNotFound { .. }))
        ));
    }

    #[test]
    fn test_empty_key() {
        let mut model = Model::from_text(BASIC_RBAC_MODEL).unwrap();
        assert!(load_policy_line(", alice", &mut model).is_err());
    }
}
