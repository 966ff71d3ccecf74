//! Model Coordinator (C3): presents a single `select(role, intent) -> model`
//! contract; maintains per-role pools over RamTier; exposes
//! `model_for_schedule(phase_id)`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::agent::{DelegationOutcome, Delegator};
use crate::backend::LlmClient;
use crate::domain::{DelegateRequest, ModelPool, ModelRole, Phase, RamTier};
use crate::error::{ObotError, Result};

use super::intent_router::role_for_intent;

/// Fixed phase -> role mapping.
pub fn role_for_phase(phase: Phase) -> ModelRole {
    match phase {
        Phase::Knowledge => ModelRole::Researcher,
        _ => ModelRole::Coder,
    }
}

pub struct ModelCoordinator {
    pools: HashMap<ModelRole, ModelPool>,
    tier: RamTier,
    backend: Arc<dyn LlmClient>,
}

impl ModelCoordinator {
    pub fn new(pools: HashMap<ModelRole, ModelPool>, tier: RamTier, backend: Arc<dyn LlmClient>) -> Self {
        Self { pools, tier, backend }
    }

    pub fn active_tier(&self) -> RamTier {
        self.tier
    }

    /// Tier-specific identifier if present, otherwise the role's primary.
    /// Unknown role yields an error.
    pub fn select(&self, role: ModelRole) -> Result<&str> {
        self.pools
            .get(&role)
            .map(|pool| pool.select(self.tier))
            .ok_or_else(|| ObotError::Validation(format!("no model pool configured for role {role}")))
    }

    pub fn model_for_schedule(&self, phase: Phase) -> Result<&str> {
        self.select(role_for_phase(phase))
    }

    pub fn select_for_intent(&self, intent: crate::domain::Intent) -> Result<&str> {
        self.select(role_for_intent(intent))
    }
}

#[async_trait]
impl Delegator for ModelCoordinator {
    async fn delegate(&self, request: &DelegateRequest) -> Result<DelegationOutcome> {
        let model = self.select(request.role)?.to_string();
        debug!(role = %request.role, model, "ModelCoordinator::delegate");
        let response = self
            .backend
            .complete(&model, request.system_prompt.as_deref(), &request.task)
            .await
            .map_err(|e| ObotError::Backend(e.to_string()))?;
        Ok(DelegationOutcome { output: response.text, tokens: response.stats.total_tokens })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockLlmClient;

    fn coordinator_with(pools: HashMap<ModelRole, ModelPool>, tier: RamTier) -> ModelCoordinator {
        ModelCoordinator::new(pools, tier, Arc::new(MockLlmClient::with_text("ok")))
    }

    #[test]
    fn role_for_phase_mapping() {
        assert_eq!(role_for_phase(Phase::Knowledge), ModelRole::Researcher);
        assert_eq!(role_for_phase(Phase::Production), ModelRole::Coder);
        assert_eq!(role_for_phase(Phase::Implement), ModelRole::Coder);
    }

    #[test]
    fn select_prefers_tier_over_primary() {
        let mut pools = HashMap::new();
        pools.insert(ModelRole::Coder, ModelPool::new("coder-small").with_tier(RamTier::Advanced, "coder-large"));
        let coordinator = coordinator_with(pools, RamTier::Advanced);
        assert_eq!(coordinator.select(ModelRole::Coder).unwrap(), "coder-large");
    }

    #[test]
    fn unknown_role_errors() {
        let coordinator = coordinator_with(HashMap::new(), RamTier::Minimal);
        assert!(coordinator.select(ModelRole::Vision).is_err());
    }

    #[tokio::test]
    async fn delegate_routes_through_selected_model() {
        let mut pools = HashMap::new();
        pools.insert(ModelRole::Researcher, ModelPool::new("researcher-1"));
        let coordinator = coordinator_with(pools, RamTier::Minimal);
        let req = DelegateRequest::from_task("summarize");
        let outcome = coordinator.delegate(&req).await.unwrap();
        assert_eq!(outcome.output, "ok");
    }
}
