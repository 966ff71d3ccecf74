//! The seam through which the Agent Executor's `Delegate` action reaches
//! the Model Coordinator, without the agent module depending on the model
//! module directly.

use async_trait::async_trait;

use crate::domain::DelegateRequest;
use crate::error::Result;

/// Output of a delegated call: the model's text output and the token count
/// consumed, for `metadata.delegation_tokens`.
pub struct DelegationOutcome {
    pub output: String,
    pub tokens: u64,
}

#[async_trait]
pub trait Delegator: Send + Sync {
    async fn delegate(&self, request: &DelegateRequest) -> Result<DelegationOutcome>;
}

/// A delegator that always fails; useful as a default when no coordinator
/// is wired up (e.g. tests of non-Delegate actions).
pub struct UnavailableDelegator;

#[async_trait]
impl Delegator for UnavailableDelegator {
    async fn delegate(&self, _request: &DelegateRequest) -> Result<DelegationOutcome> {
        Err(crate::error::ObotError::Backend("no delegator configured".into()))
    }
}
