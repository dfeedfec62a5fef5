//! Chain identity validation.
//!
//! Evaluated once at startup; mid-session chain switches are out of scope.
//! A mismatch is a hard gate: connect and mint stay disabled until the
//! session's chain flag is valid.

/// Exact comparison of the wallet's chain id against the required one.
pub fn chain_matches(current: &str, required: &str) -> bool {
    current == required
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_chain_passes() {
        assert!(chain_matches("0x4", "0x4"));
    }

    #[test]
    fn mismatched_chain_fails() {
        assert!(!chain_matches("0x1", "0x4"));
    }

    #[test]
    fn comparison_is_exact() {
        // No normalization: differing representations do not match.
        assert!(!chain_matches("0x04", "0x4"));
        assert!(!chain_matches("4", "0x4"));
    }
}
