use std::io::Read;
use std::path::Path;

use crate::broadcast::{clear_cache, BroadcastConfig, BroadcastPanel};
use crate::cli::BroadcastAction;
use crate::commands::{Console, Output};
use crate::error::Result;

fn render(config: &BroadcastConfig) -> String {
    let flag = |on: bool| if on { "on" } else { "off" };
    let mut text = format!(
        "Auto broadcast enabled: {}\nRandomized messages:    {}\n",
        flag(config.enabled),
        flag(config.randomized)
    );
    if config.messages.is_empty() {
        text.push_str("(no messages)");
    } else {
        text.push_str(&config.messages.join("\n"));
    }
    text
}

fn read_messages(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(std::fs::read_to_string(file)?)
}

async fn mounted(console: &Console) -> Result<BroadcastPanel> {
    let mut panel = BroadcastPanel::new();
    panel.mount(console).await?;
    Ok(panel)
}

pub async fn run(action: BroadcastAction, console: &Console, out: Output) -> Result<()> {
    let panel = match action {
        BroadcastAction::ClearCache => {
            clear_cache(console).await?;
            out.emit(&serde_json::json!({"cleared": true}), || {
                "Application cache cleared".into()
            });
            return Ok(());
        }
        BroadcastAction::Show => mounted(console).await?,
        BroadcastAction::Enable => {
            let mut panel = mounted(console).await?;
            panel.set_enabled(console, true).await?;
            panel
        }
        BroadcastAction::Disable => {
            let mut panel = mounted(console).await?;
            panel.set_enabled(console, false).await?;
            panel
        }
        BroadcastAction::Randomize { value } => {
            let mut panel = mounted(console).await?;
            panel.set_randomized(console, value.into()).await?;
            panel
        }
        BroadcastAction::Messages { file } => {
            let text = read_messages(&file)?;
            let mut panel = mounted(console).await?;
            // An editor's trailing newline is not a message
            panel.edit_messages(text.trim_end_matches(['\n', '\r']));
            panel.save_messages(console).await?;
            panel
        }
    };

    if let Some(config) = panel.panel().snapshot() {
        out.emit(config, || render(config));
    }
    Ok(())
}
