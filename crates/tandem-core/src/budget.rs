//! Budget allocation for LLM context windows.
//!
//! Partitions a fixed token window across conversational layers, for the
//! legacy five-layer configuration and the v2 reserve-ratio model.
//!
//! Both functions are total: any well-typed configuration produces a
//! numeric result. Percentages outside the UI's slider ranges are accepted
//! as-is, and when the five legacy layers claim more than 100% the reserve
//! clamps to zero while the layer tokens silently exceed the budget. The
//! flooring remainder is likewise never redistributed. Both behaviors
//! must match the gateway's own computation exactly; do not normalize
//! here.

use serde::Serialize;

use tandem_types::budget::{BudgetConfig, BudgetConfigV2};

/// Advisory floor for the legacy reserve, in percent. A reserve below
/// this is a warning signal for the caller, never an error.
pub const RESERVE_WARN_PERCENT: f64 = 5.0;

/// Tolerance when checking that v2 category percentages sum to 100.
pub const ALLOCATION_SUM_TOLERANCE: f64 = 0.1;

/// Absolute token counts per legacy layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayerTokens {
    pub system_prompt: u64,
    pub core_context: u64,
    pub primary_content: u64,
    pub secondary_content: u64,
    pub d5_memory: u64,
    pub reserved: u64,
}

impl LayerTokens {
    /// Sum of the five content layers, excluding the reserve.
    pub fn content_total(&self) -> u64 {
        self.system_prompt
            + self.core_context
            + self.primary_content
            + self.secondary_content
            + self.d5_memory
    }
}

/// `floor(total * pct / 100)`, clamped at zero for non-positive shares.
fn floor_share(total: u64, pct: f64) -> u64 {
    let raw = total as f64 * pct / 100.0;
    if raw <= 0.0 { 0 } else { raw.floor() as u64 }
}

/// Derived reserve percentage: whatever the five layers leave over,
/// clamped at zero when they over-allocate.
pub fn reserved_percent(config: &BudgetConfig) -> f64 {
    (100.0 - config.allocation.total()).max(0.0)
}

/// Whether the derived reserve is below the advisory floor.
///
/// Callers surface this as "reserve too small, may degrade output
/// quality"; the allocation itself still proceeds.
pub fn reserve_is_low(config: &BudgetConfig) -> bool {
    reserved_percent(config) < RESERVE_WARN_PERCENT
}

/// Turn a legacy configuration into absolute token counts per layer.
///
/// Each layer gets `floor(total_budget * pct / 100)` tokens; the reserve
/// uses the derived percentage. Deterministic and pure.
pub fn compute_layers(config: &BudgetConfig) -> LayerTokens {
    let total = config.total_budget;
    let alloc = &config.allocation;
    LayerTokens {
        system_prompt: floor_share(total, alloc.system_prompt),
        core_context: floor_share(total, alloc.core_context),
        primary_content: floor_share(total, alloc.primary_content),
        secondary_content: floor_share(total, alloc.secondary_content),
        d5_memory: floor_share(total, alloc.d5_memory),
        reserved: floor_share(total, reserved_percent(config)),
    }
}

/// Result of a v2 dynamic-budget allocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DynamicLayers {
    /// Tokens taken off the top for the model's reply.
    pub reserved_tokens: u64,
    /// What remains for content after the reserve.
    pub dynamic_budget: u64,
    pub recent_conversation: u64,
    pub local_logs: u64,
    pub d5_memory: u64,
    /// Sum of the three category percentages as configured.
    pub total_percent: f64,
}

impl DynamicLayers {
    /// Whether the category percentages sum to 100 within tolerance.
    ///
    /// Purely advisory: the allocation above is computed either way.
    pub fn allocation_consistent(&self) -> bool {
        (self.total_percent - 100.0).abs() < ALLOCATION_SUM_TOLERANCE
    }
}

/// Turn a v2 configuration into absolute token counts per category.
///
/// The reserve is `floor(total * reserve_ratio)`; the three categories
/// split the remaining dynamic budget by percentage, floored.
pub fn compute_dynamic_layers(config: &BudgetConfigV2) -> DynamicLayers {
    let reserved_raw = config.total_budget as f64 * config.reserve_ratio;
    let reserved_tokens = if reserved_raw <= 0.0 {
        0
    } else {
        reserved_raw.floor() as u64
    };
    let dynamic_budget = config.total_budget.saturating_sub(reserved_tokens);
    let alloc = &config.allocation;
    DynamicLayers {
        reserved_tokens,
        dynamic_budget,
        recent_conversation: floor_share(dynamic_budget, alloc.recent_conversation),
        local_logs: floor_share(dynamic_budget, alloc.local_logs),
        d5_memory: floor_share(dynamic_budget, alloc.d5_memory),
        total_percent: alloc.total(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_types::budget::{CategoryAllocation, D5RecallConfig, LayerAllocation, VectorSearchConfig};
    use tandem_types::role::AiRole;

    fn legacy(total: u64, alloc: LayerAllocation) -> BudgetConfig {
        BudgetConfig::new(AiRole::Executor, total, alloc)
    }

    #[test]
    fn test_compute_layers_defaults() {
        let config = legacy(32_000, LayerAllocation::default());
        let tokens = compute_layers(&config);
        assert_eq!(tokens.system_prompt, 1_600);
        assert_eq!(tokens.core_context, 3_200);
        assert_eq!(tokens.primary_content, 12_800);
        assert_eq!(tokens.secondary_content, 8_000);
        assert_eq!(tokens.d5_memory, 4_800);
        // 100 - 95 = 5% reserve
        assert_eq!(tokens.reserved, 1_600);
    }

    #[test]
    fn test_layer_sum_never_exceeds_budget_for_valid_allocation() {
        let config = legacy(
            99_999,
            LayerAllocation {
                system_prompt: 7.0,
                core_context: 13.0,
                primary_content: 33.0,
                secondary_content: 21.0,
                d5_memory: 11.0,
            },
        );
        let tokens = compute_layers(&config);
        let total = tokens.content_total() + tokens.reserved;
        assert!(total <= config.total_budget);
        // The gap is exactly the flooring remainders, so always < 6 layers' worth.
        assert!(config.total_budget - total < 6);
    }

    #[test]
    fn test_compute_layers_deterministic() {
        let config = legacy(115_000, LayerAllocation::default());
        assert_eq!(compute_layers(&config), compute_layers(&config));
    }

    #[test]
    fn test_over_allocation_clamps_reserve_to_zero() {
        // Sum = 120% -- the known over-subscription defect: reserve clamps
        // to 0 and the layers together exceed the budget.
        let config = legacy(
            10_000,
            LayerAllocation {
                system_prompt: 20.0,
                core_context: 25.0,
                primary_content: 40.0,
                secondary_content: 20.0,
                d5_memory: 15.0,
            },
        );
        assert_eq!(reserved_percent(&config), 0.0);
        let tokens = compute_layers(&config);
        assert_eq!(tokens.reserved, 0);
        assert!(tokens.content_total() > config.total_budget);
    }

    #[test]
    fn test_out_of_ui_range_percentage_accepted() {
        // The system prompt slider stops at 20, but the allocator must not
        // reject 35 -- range limits are advisory, enforced by the UI only.
        let config = legacy(
            10_000,
            LayerAllocation {
                system_prompt: 35.0,
                core_context: 10.0,
                primary_content: 20.0,
                secondary_content: 10.0,
                d5_memory: 10.0,
            },
        );
        let tokens = compute_layers(&config);
        assert_eq!(tokens.system_prompt, 3_500);
        assert_eq!(tokens.reserved, 1_500);
    }

    #[test]
    fn test_reserve_warning_threshold() {
        let comfortable = legacy(32_000, LayerAllocation::default());
        assert!(!reserve_is_low(&comfortable)); // exactly 5% is not low

        let tight = legacy(
            32_000,
            LayerAllocation {
                system_prompt: 6.0,
                ..LayerAllocation::default()
            },
        );
        assert!(reserve_is_low(&tight)); // 4% reserve
    }

    #[test]
    fn test_zero_budget() {
        let config = legacy(0, LayerAllocation::default());
        let tokens = compute_layers(&config);
        assert_eq!(tokens.content_total(), 0);
        assert_eq!(tokens.reserved, 0);
    }

    #[test]
    fn test_dynamic_layers_reference_vector() {
        let config = BudgetConfigV2 {
            total_budget: 115_000,
            reserve_ratio: 0.10,
            allocation: CategoryAllocation {
                recent_conversation: 65.0,
                local_logs: 12.5,
                d5_memory: 22.5,
            },
            vector_search: VectorSearchConfig::default(),
            d5_recall: D5RecallConfig::default(),
        };
        let layers = compute_dynamic_layers(&config);
        assert_eq!(layers.reserved_tokens, 11_500);
        assert_eq!(layers.dynamic_budget, 103_500);
        assert_eq!(layers.recent_conversation, 67_275);
        assert_eq!(layers.local_logs, 12_937);
        assert_eq!(layers.d5_memory, 23_287);
        assert!((layers.total_percent - 100.0).abs() < f64::EPSILON);
        assert!(layers.allocation_consistent());
    }

    #[test]
    fn test_dynamic_layers_inconsistent_allocation_still_computes() {
        let config = BudgetConfigV2 {
            total_budget: 100_000,
            reserve_ratio: 0.20,
            allocation: CategoryAllocation {
                recent_conversation: 50.0,
                local_logs: 30.0,
                d5_memory: 30.0,
            },
            vector_search: VectorSearchConfig::default(),
            d5_recall: D5RecallConfig::default(),
        };
        let layers = compute_dynamic_layers(&config);
        assert_eq!(layers.reserved_tokens, 20_000);
        assert_eq!(layers.dynamic_budget, 80_000);
        assert_eq!(layers.recent_conversation, 40_000);
        assert!((layers.total_percent - 110.0).abs() < f64::EPSILON);
        assert!(!layers.allocation_consistent());
    }

    #[test]
    fn test_dynamic_layers_full_reserve() {
        let config = BudgetConfigV2 {
            total_budget: 50_000,
            reserve_ratio: 1.0,
            allocation: CategoryAllocation {
                recent_conversation: 65.0,
                local_logs: 20.0,
                d5_memory: 15.0,
            },
            vector_search: VectorSearchConfig::default(),
            d5_recall: D5RecallConfig::default(),
        };
        let layers = compute_dynamic_layers(&config);
        assert_eq!(layers.reserved_tokens, 50_000);
        assert_eq!(layers.dynamic_budget, 0);
        assert_eq!(layers.recent_conversation, 0);
    }
}
