//! Plain-text rendering of a derived view

use colored::Colorize;
use duel::{format_ether, ActionKind, Address, GamePhase, GameView};

fn describe_action(action: &ActionKind) -> String {
    match action {
        ActionKind::ViewStatus => "view status".to_string(),
        ActionKind::Join { stake } => format!("join (send {} ETH)", format_ether(*stake)),
        ActionKind::Reveal => "reveal your move".to_string(),
        ActionKind::ClaimTimeoutRefund => "claim timeout refund".to_string(),
        ActionKind::ClaimTimeoutStake => "claim timeout stake".to_string(),
    }
}

pub fn render_view(view: &GameView, contract: Address) -> String {
    let headline = match view.phase {
        GamePhase::SettledAmbiguous { .. } => view.status.headline.yellow().bold(),
        _ if view.phase.is_timed_out() => view.status.headline.red().bold(),
        _ => view.status.headline.green().bold(),
    };

    let mut lines = vec![headline.to_string(), format!("Game: {}", contract)];
    lines.extend(view.status.stake_caption.clone());
    lines.push(format!("Viewing as: {}", view.role));

    if !view.phase.is_settled() && view.remaining > 0 {
        lines.push(format!("Time left: {}s (deadline {})", view.remaining, view.deadline));
    }

    lines.push("Actions:".to_string());
    lines.extend(view.actions.iter().map(|action| format!("  - {}", describe_action(action))));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
