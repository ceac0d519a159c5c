//! Request-token verification (out of scope per spec.md §2, carried as an
//! interface so `growthloop-server` has a seam to plug a real JWT validator
//! into, the way the teacher's `vibes_core::auth::JwtValidator` plugs into
//! `vibes_server`'s auth middleware).

use async_trait::async_trait;

use crate::error::Result;

/// An authenticated caller identity resolved from a request token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub external_identity_id: String,
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity>;
}

/// A verifier that trusts the bearer token as the external identity id
/// verbatim. Stands in for real JWT/JWKS verification in tests and local
/// development.
#[derive(Debug, Default)]
pub struct StubTokenVerifier;

#[async_trait]
impl TokenVerifier for StubTokenVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity> {
        if token.is_empty() {
            return Err(crate::error::Error::MissingToken);
        }
        Ok(VerifiedIdentity {
            external_identity_id: token.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_verifier_echoes_the_token_as_identity() {
        let verifier = StubTokenVerifier;
        let identity = verifier.verify("ext_42").await.unwrap();
        assert_eq!(identity.external_identity_id, "ext_42");
    }

    #[tokio::test]
    async fn stub_verifier_rejects_empty_token() {
        let verifier = StubTokenVerifier;
        assert!(verifier.verify("").await.is_err());
    }
}
