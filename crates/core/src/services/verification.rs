//! Email verification collaborator.
//!
//! Provides an abstraction over the verification-code store consulted during
//! registration and password changes. Code issuance and delivery live outside
//! this system; services only verify and invalidate.

use async_trait::async_trait;
use kidvid_common::AppResult;
use std::sync::Arc;

/// Trait for verification code checks.
///
/// This allows the core services to gate registration and password changes
/// on an emailed code without depending on how codes are issued or stored.
#[async_trait]
pub trait CodeVerifier: Send + Sync {
    /// Check whether `code` matches an unexpired code issued for `email`.
    async fn verify(&self, email: &str, code: &str) -> AppResult<bool>;

    /// Invalidate any outstanding code for `email` after successful use.
    async fn invalidate(&self, email: &str) -> AppResult<()>;
}

/// A no-op implementation of `CodeVerifier` that accepts every code.
///
/// Used when no verification backend is configured; deployments that require
/// real email verification supply their own implementation.
#[derive(Clone, Default)]
pub struct NoOpVerifier;

#[async_trait]
impl CodeVerifier for NoOpVerifier {
    async fn verify(&self, _email: &str, _code: &str) -> AppResult<bool> {
        Ok(true)
    }

    async fn invalidate(&self, _email: &str) -> AppResult<()> {
        Ok(())
    }
}

/// Wrapper for boxed `CodeVerifier` trait object.
pub type VerificationService = Arc<dyn CodeVerifier>;
