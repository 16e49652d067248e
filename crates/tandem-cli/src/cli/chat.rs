//! Interactive chat loop against one AI role.

use std::io::Write as _;

use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};

use tandem_core::engine::DualChatSession;
use tandem_gateway::GatewayClient;
use tandem_types::role::{AiRole, SenderRole};

/// Read lines from stdin and stream each turn's reply to stdout.
///
/// `/clear` wipes the current channel; EOF (Ctrl-D) exits. A failed turn
/// prints the error and keeps the loop alive, since the error text is
/// already recorded in the channel.
pub async fn run_chat_loop(
    client: GatewayClient,
    role: AiRole,
    sender: SenderRole,
) -> anyhow::Result<()> {
    let mut session = DualChatSession::new(client);

    println!(
        "{} {} (speaking as {})",
        style("Chatting with").bold(),
        style(role.label()).cyan().bold(),
        style(sender).green()
    );
    println!("{}", style("/clear resets the channel, Ctrl-D exits").dim());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", style(">").green().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "/clear" {
            session.store_mut().clear(role);
            println!("{}", style("channel cleared").dim());
            continue;
        }

        print!("{} ", style(role.label()).cyan().bold());
        std::io::stdout().flush()?;
        let result = session
            .send_with(role, sender, input, |delta| {
                print!("{delta}");
                let _ = std::io::stdout().flush();
            })
            .await;
        println!();

        if let Err(e) = result {
            eprintln!("{} {}", style("error:").red().bold(), e);
        }
    }

    Ok(())
}
