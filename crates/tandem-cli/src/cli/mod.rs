//! CLI argument definitions and command handlers.

pub mod budget;
pub mod chat;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use tandem_types::role::{AiRole, SenderRole};

/// Console for operating an executor/auditor AI pair through a gateway.
#[derive(Parser)]
#[command(name = "tandem", version, about)]
pub struct Cli {
    /// Base URL of the gateway API
    #[arg(
        long,
        env = "TANDEM_GATEWAY_URL",
        default_value = "http://localhost:22888/api/b2",
        global = true
    )]
    pub gateway_url: String,

    /// Gateway API key (sent as X-API-Key)
    #[arg(long, env = "TANDEM_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect or edit context-budget configuration
    Budget {
        #[command(subcommand)]
        action: BudgetAction,
    },

    /// Interactive chat with one AI role
    Chat {
        /// Which AI role to talk to
        #[arg(long, default_value = "executor")]
        role: AiRole,

        /// Which speaker the outbound turns are attributed to
        #[arg(long, default_value = "human")]
        sender: SenderRole,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Fetch a role's configuration and show the layer allocation
    Show {
        #[arg(long, default_value = "executor")]
        role: AiRole,
    },

    /// Preview a v2 dynamic-budget split without touching the gateway
    Plan {
        /// Total context window in tokens
        #[arg(long, default_value_t = 115_000)]
        total: u64,

        /// Fraction reserved for the model's reply
        #[arg(long, default_value_t = 0.10)]
        reserve: f64,

        /// Recent conversation share, percent of the dynamic budget
        #[arg(long, default_value_t = 65.0)]
        recent: f64,

        /// Local logs share, percent
        #[arg(long, default_value_t = 12.5)]
        logs: f64,

        /// D5 memory share, percent
        #[arg(long, default_value_t = 22.5)]
        memory: f64,

        /// Save the plan to the gateway instead of only previewing it
        #[arg(long)]
        save: bool,

        /// Role the saved plan applies to
        #[arg(long, default_value = "executor")]
        role: AiRole,

        /// Skip the confirmation prompt when saving
        #[arg(long)]
        yes: bool,
    },

    /// Save a legacy five-layer configuration to the gateway
    Set {
        #[arg(long)]
        role: AiRole,

        /// Total context window in tokens
        #[arg(long)]
        total: u64,

        #[arg(long, default_value_t = 5.0)]
        system_prompt: f64,

        #[arg(long, default_value_t = 10.0)]
        core_context: f64,

        #[arg(long, default_value_t = 40.0)]
        primary_content: f64,

        #[arg(long, default_value_t = 25.0)]
        secondary_content: f64,

        #[arg(long, default_value_t = 15.0)]
        d5_memory: f64,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}
