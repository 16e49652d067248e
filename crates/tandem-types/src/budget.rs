//! Context-budget configuration for the two AI roles.
//!
//! Two configuration shapes coexist: the legacy five-layer model where the
//! reserve is whatever the layers leave over, and the v2 "dynamic budget"
//! model where the reserve is taken off the top as a ratio and three
//! content categories split the remainder.
//!
//! Both shapes round-trip through the remote gateway; nothing is persisted
//! locally. Percentages are stored as given -- over- or under-allocation
//! is a UI-level advisory concern, never rejected here.

use serde::{Deserialize, Serialize};

use crate::role::AiRole;

/// Legacy five-layer percentage allocation.
///
/// Percentages are in `[0, 100]` by convention; the UI sliders enforce
/// narrower ranges but nothing structural does. The reserve is derived
/// (`max(0, 100 - sum)`), never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerAllocation {
    pub system_prompt: f64,
    pub core_context: f64,
    pub primary_content: f64,
    pub secondary_content: f64,
    pub d5_memory: f64,
}

impl LayerAllocation {
    /// Sum of the five stored percentages.
    pub fn total(&self) -> f64 {
        self.system_prompt
            + self.core_context
            + self.primary_content
            + self.secondary_content
            + self.d5_memory
    }
}

impl Default for LayerAllocation {
    /// The editing defaults the original console seeds the form with.
    fn default() -> Self {
        Self {
            system_prompt: 5.0,
            core_context: 10.0,
            primary_content: 40.0,
            secondary_content: 25.0,
            d5_memory: 15.0,
        }
    }
}

/// Legacy per-role budget configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetConfig {
    pub role: AiRole,
    /// Total context window in tokens.
    pub total_budget: u64,
    pub allocation: LayerAllocation,
}

impl BudgetConfig {
    pub fn new(role: AiRole, total_budget: u64, allocation: LayerAllocation) -> Self {
        Self {
            role,
            total_budget,
            allocation,
        }
    }
}

/// Core-prompt injection settings carried alongside the legacy config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectionConfig {
    /// Re-inject the core prompt every N messages.
    pub message_interval: u32,
    /// Re-inject the core prompt every N tokens.
    pub token_threshold: u32,
}

impl Default for InjectionConfig {
    fn default() -> Self {
        Self {
            message_interval: 20,
            token_threshold: 8000,
        }
    }
}

/// V2 three-category percentage allocation over the dynamic budget.
///
/// Intended to sum to 100 but not structurally enforced; the allocator
/// reports the sum and the caller decides whether to flag it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryAllocation {
    pub recent_conversation: f64,
    pub local_logs: f64,
    pub d5_memory: f64,
}

impl CategoryAllocation {
    pub fn total(&self) -> f64 {
        self.recent_conversation + self.local_logs + self.d5_memory
    }
}

/// Vector search tuning for context retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorSearchConfig {
    pub top_k: u32,
    pub threshold: f64,
}

impl Default for VectorSearchConfig {
    fn default() -> Self {
        Self {
            top_k: 20,
            threshold: 0.5,
        }
    }
}

/// D5 memory recall tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct D5RecallConfig {
    pub limit: u32,
    pub threshold: f64,
}

impl Default for D5RecallConfig {
    fn default() -> Self {
        Self {
            limit: 10,
            threshold: 0.7,
        }
    }
}

/// V2 dynamic-budget configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetConfigV2 {
    /// Total context window in tokens.
    pub total_budget: u64,
    /// Fraction of the total reserved for the model's reply, in `[0, 1]`.
    pub reserve_ratio: f64,
    pub allocation: CategoryAllocation,
    pub vector_search: VectorSearchConfig,
    pub d5_recall: D5RecallConfig,
}

impl BudgetConfigV2 {
    /// Default v2 configuration for a role (the original console's seeds).
    pub fn default_for(role: AiRole) -> Self {
        let allocation = match role {
            AiRole::Executor => CategoryAllocation {
                recent_conversation: 65.0,
                local_logs: 12.5,
                d5_memory: 22.5,
            },
            AiRole::Auditor => CategoryAllocation {
                recent_conversation: 55.0,
                local_logs: 20.0,
                d5_memory: 25.0,
            },
        };
        Self {
            total_budget: 115_000,
            reserve_ratio: 0.10,
            allocation,
            vector_search: VectorSearchConfig::default(),
            d5_recall: D5RecallConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_allocation_default_totals_95() {
        let alloc = LayerAllocation::default();
        assert!((alloc.total() - 95.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_v2_defaults_sum_to_100() {
        for role in [AiRole::Executor, AiRole::Auditor] {
            let config = BudgetConfigV2::default_for(role);
            assert!((config.allocation.total() - 100.0).abs() < 0.1);
            assert_eq!(config.total_budget, 115_000);
            assert!((config.reserve_ratio - 0.10).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_budget_config_serde_field_names() {
        let config = BudgetConfig::new(AiRole::Executor, 32_000, LayerAllocation::default());
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["role"], "executor");
        assert_eq!(json["total_budget"], 32_000);
        assert_eq!(json["allocation"]["system_prompt"], 5.0);
        assert_eq!(json["allocation"]["d5_memory"], 15.0);
    }

    #[test]
    fn test_v2_config_serde_field_names() {
        let config = BudgetConfigV2::default_for(AiRole::Auditor);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["reserve_ratio"], 0.10);
        assert_eq!(json["allocation"]["recent_conversation"], 55.0);
        assert_eq!(json["vector_search"]["top_k"], 20);
        assert_eq!(json["d5_recall"]["limit"], 10);
    }

    #[test]
    fn test_injection_defaults() {
        let injection = InjectionConfig::default();
        assert_eq!(injection.message_interval, 20);
        assert_eq!(injection.token_threshold, 8000);
    }
}
