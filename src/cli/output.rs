//! Output formatting utilities for CLI.

use warden::replay::ThreatReport;

/// Format threat reports as human-readable text.
pub(super) fn format_text(reports: &[ThreatReport]) -> String {
    let mut output = String::new();

    for report in reports {
        output.push_str(&format!(
            "Turn {}: mana {} (enemy {})",
            report.turn, report.mana, report.enemy_mana
        ));
        if report.flagged {
            output.push_str(" [flagged]");
        }
        output.push('\n');

        if report.threats.is_empty() {
            output.push_str("  no threats\n");
            continue;
        }
        for threat in &report.threats {
            let eta = threat
                .turns_before_hit
                .map_or_else(|| "-".to_string(), |turns| turns.to_string());
            output.push_str(&format!(
                "  monster {:>4}  dist {:>7.0}  eta {:>3}",
                threat.id, threat.distance, eta
            ));
            if threat.can_hit {
                output.push_str("  CAN HIT");
            }
            if threat.shield_life > 0 {
                output.push_str(&format!("  shield {}", threat.shield_life));
            }
            output.push('\n');
        }
    }

    output
}
