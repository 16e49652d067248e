//! Tandem CLI entry point.
//!
//! Binary name: `tandem`
//!
//! Parses CLI arguments, initializes tracing, then dispatches to the
//! budget or chat command handlers. All state lives behind the remote
//! gateway; the CLI only needs its URL and API key.

mod cli;

use clap::Parser;
use clap_complete::generate;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use cli::{BudgetAction, Cli, Commands};
use tandem_gateway::GatewayClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,tandem=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Shell completions don't need a gateway connection
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "tandem", &mut std::io::stdout());
        return Ok(());
    }

    let api_key = cli.api_key.clone().ok_or_else(|| {
        anyhow::anyhow!("gateway API key not set. Pass --api-key or set TANDEM_API_KEY")
    })?;
    let client = GatewayClient::new(cli.gateway_url.clone(), SecretString::from(api_key));

    match cli.command {
        Commands::Budget { action } => match action {
            BudgetAction::Show { role } => {
                cli::budget::show_budget(&client, role, cli.json).await?;
            }
            BudgetAction::Plan {
                total,
                reserve,
                recent,
                logs,
                memory,
                save,
                role,
                yes,
            } => {
                let plan = cli::budget::PlanArgs {
                    total,
                    reserve,
                    recent,
                    logs,
                    memory,
                };
                cli::budget::plan_budget(&client, role, plan, save, yes, cli.json).await?;
            }
            BudgetAction::Set {
                role,
                total,
                system_prompt,
                core_context,
                primary_content,
                secondary_content,
                d5_memory,
                yes,
            } => {
                cli::budget::set_budget(
                    &client,
                    role,
                    total,
                    [
                        system_prompt,
                        core_context,
                        primary_content,
                        secondary_content,
                        d5_memory,
                    ],
                    yes,
                )
                .await?;
            }
        },

        Commands::Chat { role, sender } => {
            cli::chat::run_chat_loop(client, role, sender).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
