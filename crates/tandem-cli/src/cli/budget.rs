//! Budget command handlers: show, plan, set.

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use console::style;
use dialoguer::Confirm;

use tandem_core::budget::{
    DynamicLayers, LayerTokens, compute_dynamic_layers, compute_layers, reserve_is_low,
    reserved_percent,
};
use tandem_gateway::GatewayClient;
use tandem_types::budget::{
    BudgetConfig, BudgetConfigV2, CategoryAllocation, D5RecallConfig, InjectionConfig,
    LayerAllocation, VectorSearchConfig,
};
use tandem_types::role::AiRole;
use tandem_types::wire::{ContextConfigPayload, ContextConfigUpdate, ContextConfigV2Update};

fn config_from_payload(payload: &ContextConfigPayload) -> BudgetConfig {
    BudgetConfig::new(
        payload.role,
        payload.total_budget,
        LayerAllocation {
            system_prompt: payload.allocation.system_prompt,
            core_context: payload.allocation.core_context,
            primary_content: payload.allocation.primary_content,
            secondary_content: payload.allocation.secondary_content,
            d5_memory: payload.allocation.d5_memory,
        },
    )
}

fn print_reserve_warning() {
    eprintln!(
        "  {} {}",
        style("!").yellow().bold(),
        style("reserve below 5%, may degrade output quality").yellow()
    );
}

/// Fetch one role's configuration and render its layer allocation.
pub async fn show_budget(client: &GatewayClient, role: AiRole, json: bool) -> anyhow::Result<()> {
    let payload = client.fetch_context_config(role).await?;
    let config = config_from_payload(&payload);
    let tokens = compute_layers(&config);

    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
        return Ok(());
    }

    println!(
        "{} {} ({} tokens total)",
        style("Context budget for").bold(),
        style(role.label()).cyan().bold(),
        payload.total_budget
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Layer", "Percent", "Tokens", "Gateway"]);
    let rows: [(&str, f64, u64, u64); 6] = [
        (
            "System prompt",
            config.allocation.system_prompt,
            tokens.system_prompt,
            payload.layer_tokens.system_prompt,
        ),
        (
            "Core context",
            config.allocation.core_context,
            tokens.core_context,
            payload.layer_tokens.core_context,
        ),
        (
            "Primary content",
            config.allocation.primary_content,
            tokens.primary_content,
            payload.layer_tokens.primary_content,
        ),
        (
            "Secondary content",
            config.allocation.secondary_content,
            tokens.secondary_content,
            payload.layer_tokens.secondary_content,
        ),
        (
            "D5 memory",
            config.allocation.d5_memory,
            tokens.d5_memory,
            payload.layer_tokens.d5_memory,
        ),
        (
            "Reserved",
            reserved_percent(&config),
            tokens.reserved,
            payload.layer_tokens.reserved,
        ),
    ];
    for (name, pct, local, gateway) in rows {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(format!("{pct:.1}%")),
            Cell::new(local),
            Cell::new(gateway),
        ]);
    }
    println!("{table}");

    if reserve_is_low(&config) {
        print_reserve_warning();
    }
    Ok(())
}

/// Inputs for a v2 dynamic-budget plan.
pub struct PlanArgs {
    pub total: u64,
    pub reserve: f64,
    pub recent: f64,
    pub logs: f64,
    pub memory: f64,
}

/// Compute a v2 dynamic split, render it, and optionally save it upstream.
pub async fn plan_budget(
    client: &GatewayClient,
    role: AiRole,
    plan: PlanArgs,
    save: bool,
    yes: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = BudgetConfigV2 {
        total_budget: plan.total,
        reserve_ratio: plan.reserve,
        allocation: CategoryAllocation {
            recent_conversation: plan.recent,
            local_logs: plan.logs,
            d5_memory: plan.memory,
        },
        vector_search: VectorSearchConfig::default(),
        d5_recall: D5RecallConfig::default(),
    };
    let layers = compute_dynamic_layers(&config);

    if json {
        println!("{}", serde_json::to_string_pretty(&layers)?);
    } else {
        print_dynamic_layers(&layers, plan.total);
        if !layers.allocation_consistent() {
            eprintln!(
                "  {} {}",
                style("!").yellow().bold(),
                style(format!(
                    "category percentages sum to {:.1}%, expected 100%",
                    layers.total_percent
                ))
                .yellow()
            );
        }
    }

    if !save {
        return Ok(());
    }

    if !yes {
        let proceed = Confirm::new()
            .with_prompt(format!("Save this plan for the {} role?", role.label()))
            .default(false)
            .interact()?;
        if !proceed {
            println!("{}", style("Aborted; nothing saved.").dim());
            return Ok(());
        }
    }

    let update = ContextConfigV2Update {
        role,
        total_budget: config.total_budget,
        reserve_ratio: config.reserve_ratio,
        allocation: config.allocation,
        vector_search: config.vector_search,
        d5_recall: config.d5_recall,
    };
    client.save_context_config_v2(&update).await?;
    println!("{} configuration saved", style("ok").green().bold());
    Ok(())
}

fn print_dynamic_layers(layers: &DynamicLayers, total: u64) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Category", "Tokens"]);
    table.add_row(vec![Cell::new("Reserved for reply"), Cell::new(layers.reserved_tokens)]);
    table.add_row(vec![Cell::new("Dynamic budget"), Cell::new(layers.dynamic_budget)]);
    table.add_row(vec![
        Cell::new("Recent conversation"),
        Cell::new(layers.recent_conversation),
    ]);
    table.add_row(vec![Cell::new("Local logs"), Cell::new(layers.local_logs)]);
    table.add_row(vec![Cell::new("D5 memory"), Cell::new(layers.d5_memory)]);
    println!("{} ({} tokens total)", style("Dynamic budget plan").bold(), total);
    println!("{table}");
}

/// Persist a legacy five-layer configuration to the gateway.
pub async fn set_budget(
    client: &GatewayClient,
    role: AiRole,
    total: u64,
    percentages: [f64; 5],
    yes: bool,
) -> anyhow::Result<()> {
    let [system_prompt, core_context, primary_content, secondary_content, d5_memory] = percentages;
    let config = BudgetConfig::new(
        role,
        total,
        LayerAllocation {
            system_prompt,
            core_context,
            primary_content,
            secondary_content,
            d5_memory,
        },
    );
    let tokens: LayerTokens = compute_layers(&config);

    println!(
        "Saving {} budget: {} tokens, reserve {:.1}% ({} tokens)",
        style(role.label()).cyan().bold(),
        total,
        reserved_percent(&config),
        tokens.reserved
    );
    if reserve_is_low(&config) {
        print_reserve_warning();
    }

    if !yes {
        let proceed = Confirm::new()
            .with_prompt("Write this configuration to the gateway?")
            .default(false)
            .interact()?;
        if !proceed {
            println!("{}", style("Aborted; nothing saved.").dim());
            return Ok(());
        }
    }

    let injection = InjectionConfig::default();
    let update = ContextConfigUpdate {
        role,
        total_budget: total,
        system_prompt_pct: system_prompt,
        core_context_pct: core_context,
        primary_content_pct: primary_content,
        secondary_content_pct: secondary_content,
        d5_memory_pct: d5_memory,
        injection_message_interval: injection.message_interval,
        injection_token_threshold: injection.token_threshold,
    };
    client.save_context_config(&update).await?;
    println!("{} configuration saved", style("ok").green().bold());
    Ok(())
}
