//! growthloop-identity: webhook signature verification and the
//! request-token interface (spec.md component C5 plus the out-of-scope
//! auth seam).

pub mod error;
pub mod token;
pub mod webhook;

pub use error::{Error, Result};
pub use token::{StubTokenVerifier, TokenVerifier, VerifiedIdentity};
pub use webhook::verify_signature;
