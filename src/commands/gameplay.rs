use serde_json::json;

use crate::cli::GameplayAction;
use crate::commands::{Console, Output};
use crate::error::Result;
use crate::gameplay::{GameplayPanel, GameplayThresholds, Threshold, NOT_WIRED_NOTICE, THRESHOLDS_WIRED};

fn render(thresholds: &GameplayThresholds) -> String {
    let mut lines = Vec::new();
    if !THRESHOLDS_WIRED {
        lines.push(NOT_WIRED_NOTICE.to_string());
    }
    for threshold in Threshold::ALL {
        let s = thresholds.slider(threshold);
        lines.push(format!(
            "{:<30} {:>5}   [{}..{}, step {}]",
            s.label,
            s.value(),
            s.min,
            s.max,
            s.step
        ));
    }
    lines.join("\n")
}

pub async fn run(action: GameplayAction, console: &Console, out: Output) -> Result<()> {
    let mut page = GameplayPanel::new();
    // Roles feed the admin roster; a failure here is already shown and the
    // thresholds are still worth printing.
    if page.mount(console).await.is_err() {
        log::info!("Continuing without admin groups");
    }

    if let GameplayAction::Set { threshold, value } = action {
        page.thresholds.set(threshold.into(), value);
    }

    let thresholds = &page.thresholds;
    out.emit(
        &json!({
            "wired": THRESHOLDS_WIRED,
            "thresholds": thresholds,
            "adminRoles": page.admin_roles(),
        }),
        || render(thresholds),
    );
    Ok(())
}
