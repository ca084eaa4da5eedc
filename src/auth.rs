//! Credential verification seam for the login endpoint.
//!
//! The default verifier compares plaintext, which matches the seeded demo
//! accounts. The trait lets a deployment substitute a hashing scheme without
//! touching the login contract.

use async_trait::async_trait;

/// Checks a presented password against the stored credential for a user.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, presented: &str, stored: &str) -> bool;
}

/// Byte-for-byte comparison of the presented password with the stored one.
#[derive(Debug, Default, Clone)]
pub struct PlaintextVerifier;

#[async_trait]
impl CredentialVerifier for PlaintextVerifier {
    async fn verify(&self, presented: &str, stored: &str) -> bool {
        presented == stored
    }
}
