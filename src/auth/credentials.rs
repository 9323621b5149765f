use crate::utils::auth::constant_time_eq;

/// Compares a supplied password against the stored credential
///
/// This is the only place that knows how credentials are stored. Swapping in
/// a salted one-way hash means providing another implementation here; the
/// login flow and the user store stay untouched.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, stored: &str, supplied: &str) -> bool;
}

// TODO: replace with an argon2-backed verifier once existing users.json files have a migration path
/// Stored credential is the password as supplied at registration
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextVerifier;

impl CredentialVerifier for PlaintextVerifier {
    fn verify(&self, stored: &str, supplied: &str) -> bool {
        constant_time_eq(supplied, stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plaintext_match() {
        assert!(PlaintextVerifier.verify("hunter22", "hunter22"));
    }

    #[test]
    fn test_plaintext_mismatch() {
        assert!(!PlaintextVerifier.verify("hunter22", "hunter23"));
        assert!(!PlaintextVerifier.verify("hunter22", ""));
    }

    #[test]
    fn test_verifier_as_trait_object() {
        struct RejectAll;
        impl CredentialVerifier for RejectAll {
            fn verify(&self, _: &str, _: &str) -> bool {
                false
            }
        }

        let verifiers: Vec<Box<dyn CredentialVerifier>> = vec![Box::new(PlaintextVerifier), Box::new(RejectAll)];
        let results: Vec<bool> = verifiers.iter().map(|v| v.verify("pw", "pw")).collect();
        assert_eq!(results, vec![true, false]);
    }
}
