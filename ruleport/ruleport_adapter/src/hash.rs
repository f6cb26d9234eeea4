//! Record identifiers.

use blake3::Hasher;

/// Bytes of the BLAKE3 digest kept in an identifier.
const ID_BYTES: usize = 16;

/// Identifier of the record storing `rule` under `ptype`.
///
/// The hash input is `ptype` and the rule values joined with `,`, so the
/// identifier changes with any value and with value order. The result is
/// 32 lowercase hex characters.
pub fn policy_id(ptype: &str, rule: &[String]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(ptype.as_bytes());
    for value in rule {
        hasher.update(b",");
        hasher.update(value.as_bytes());
    }
    hex::encode(&hasher.finalize().as_bytes()[..ID_BYTES])
}
