//! # Issuance Policy
//!
//! Tunable limits enforced by the issuance path before any cryptography
//! runs. Defaults match production policy; tests construct tighter ones.

/// Limits applied to every issuance request.
#[derive(Debug, Clone)]
pub struct IssuancePolicy {
    /// Maximum serialized size of the claim set, in bytes.
    pub max_claims_bytes: usize,
}

impl Default for IssuancePolicy {
    fn default() -> Self {
        Self {
            // 100 KiB of serialized claims.
            max_claims_bytes: 100 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cap_is_100_kib() {
        assert_eq!(IssuancePolicy::default().max_claims_bytes, 102_400);
    }
}
