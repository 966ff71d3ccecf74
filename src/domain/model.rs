//! ModelRole, RAMTier, and Intent — the vocabulary the Model Coordinator and
//! Intent Router operate over.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelRole {
    Orchestrator,
    Coder,
    Researcher,
    Vision,
}

impl ModelRole {
    pub const ALL: [ModelRole; 4] =
        [ModelRole::Orchestrator, ModelRole::Coder, ModelRole::Researcher, ModelRole::Vision];
}

impl std::fmt::Display for ModelRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ModelRole::Orchestrator => "orchestrator",
            ModelRole::Coder => "coder",
            ModelRole::Researcher => "researcher",
            ModelRole::Vision => "vision",
        };
        write!(f, "{s}")
    }
}

/// Five ordered bands of detected host memory, used to pick a tier-specific
/// model identifier when one is configured for the active role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RamTier {
    Minimal,
    Compact,
    Balanced,
    Performance,
    Advanced,
}

impl RamTier {
    /// Classify total physical memory, in GiB, into fixed bands:
    /// `[0,15]->Minimal`, `[16,23]->Compact`, `[24,31]->Balanced`,
    /// `[32,63]->Performance`, `[64,inf)->Advanced`.
    pub fn from_total_gib(gib: u64) -> Self {
        match gib {
            0..=15 => RamTier::Minimal,
            16..=23 => RamTier::Compact,
            24..=31 => RamTier::Balanced,
            32..=63 => RamTier::Performance,
            _ => RamTier::Advanced,
        }
    }
}

impl std::fmt::Display for RamTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RamTier::Minimal => "minimal",
            RamTier::Compact => "compact",
            RamTier::Balanced => "balanced",
            RamTier::Performance => "performance",
            RamTier::Advanced => "advanced",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Coding,
    Research,
    Writing,
    Vision,
}

/// Each role holds a primary fallback model identifier plus an optional
/// per-tier override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPool {
    pub primary: String,
    pub tier_map: HashMap<RamTier, String>,
}

impl ModelPool {
    pub fn new(primary: impl Into<String>) -> Self {
        Self { primary: primary.into(), tier_map: HashMap::new() }
    }

    pub fn with_tier(mut self, tier: RamTier, model: impl Into<String>) -> Self {
        self.tier_map.insert(tier, model.into());
        self
    }

    /// Return the tier-specific identifier if present, otherwise the
    /// role's primary.
    pub fn select(&self, tier: RamTier) -> &str {
        self.tier_map.get(&tier).map(String::as_str).unwrap_or(&self.primary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ram_tier_bands() {
        assert_eq!(RamTier::from_total_gib(8), RamTier::Minimal);
        assert_eq!(RamTier::from_total_gib(15), RamTier::Minimal);
        assert_eq!(RamTier::from_total_gib(16), RamTier::Compact);
        assert_eq!(RamTier::from_total_gib(23), RamTier::Compact);
        assert_eq!(RamTier::from_total_gib(24), RamTier::Balanced);
        assert_eq!(RamTier::from_total_gib(31), RamTier::Balanced);
        assert_eq!(RamTier::from_total_gib(32), RamTier::Performance);
        assert_eq!(RamTier::from_total_gib(63), RamTier::Performance);
        assert_eq!(RamTier::from_total_gib(64), RamTier::Advanced);
        assert_eq!(RamTier::from_total_gib(512), RamTier::Advanced);
    }

    #[test]
    fn pool_prefers_tier_specific_over_primary() {
        let pool = ModelPool::new("llama3:8b").with_tier(RamTier::Advanced, "llama3:70b");
        assert_eq!(pool.select(RamTier::Advanced), "llama3:70b");
        assert_eq!(pool.select(RamTier::Minimal), "llama3:8b");
    }
}
