//! Command implementations
//!
//! - **policy**: single-rule writes and removals
//! - **query**: bulk import, listing and counting

pub mod policy;
pub mod query;

use anyhow::bail;

/// The section a rule type belongs to: `p` for policies, `g` for groupings.
pub fn section_of(ptype: &str) -> anyhow::Result<&'static str> {
    match ptype.chars().next() {
        Some('p') => Ok("p"),
        Some('g') => Ok("g"),
        _ => bail!("rule type must start with 'p' or 'g': {:?}", ptype),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_of() {
        assert_eq!(section_of("p").unwrap(), "p");
        assert_eq!(section_of("g2").unwrap(), "g");
        assert!(section_of("e").is_err());
        assert!(section_of("").is_err());
    }
}
