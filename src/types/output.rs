//! Terminal rendering of a ScoreResult

use colored::{ColoredString, Colorize};

use crate::types::{ArousalResult, RiskTier, ScoreResult};

fn paint(text: String, tier: RiskTier) -> ColoredString {
    match tier {
        RiskTier::Minimal => text.green(),
        RiskTier::Moderate => text.yellow(),
        RiskTier::Significant => text.truecolor(255, 140, 0),
        RiskTier::Catastrophic => text.red(),
    }
}

fn arousal_line(label: &str, r: &ArousalResult) -> String {
    let state = if r.arousal { "AROUSED" } else { "calm" };
    let note = if r.is_missing_half() { " (missing half)" } else { "" };
    format!(
        "  {label}: {state:<8} first={:.1} second={:.1} Δ={:.1} rel={:+.3}{note}",
        r.mean_first, r.mean_second, r.delta, r.rel_diff
    )
}

impl ScoreResult {
    /// Multi-line colored block for interactive use
    pub fn to_terminal_string(&self) -> String {
        let tier = self.risk_tier;
        let mut lines = Vec::new();

        lines.push(
            paint(
                format!(
                    "{} COMPATIBILITY {}% | RISK TIER {}",
                    tier.emoji(),
                    self.compatibility,
                    tier
                ),
                tier,
            )
            .bold()
            .to_string(),
        );
        lines.push(format!("  cost tier: {}", tier.price()));
        lines.push(format!(
            "  weak link: {} ({})",
            self.weak_link.name,
            self.weak_link.reason.description()
        ));
        lines.push(format!(
            "  sub-scores: scl={:.2} slider={:.2} buttons={:.2}",
            self.sub_scores.scl, self.sub_scores.slider, self.sub_scores.buttons
        ));
        lines.push(arousal_line("P0", &self.arousal.persona0));
        lines.push(arousal_line("P1", &self.arousal.persona1));

        if let Some(scenario) = self.fallback_scenario {
            lines.push(
                format!(
                    "  ⚠ synthetic data: scenario {} ({})",
                    scenario,
                    self.health.reason.description()
                )
                .yellow()
                .to_string(),
            );
        }
        let recoveries = self.recoveries();
        if !recoveries.is_empty() {
            let codes: Vec<&str> = recoveries.iter().map(|r| r.code()).collect();
            lines.push(format!("  recovered: {}", codes.join(", ")).dimmed().to_string());
        }
        lines.push(
            format!(
                "  samples={} trace={} digest={}",
                self.sample_count,
                self.trace.len(),
                &self.session_digest[..self.session_digest.len().min(12)]
            )
            .dimmed()
            .to_string(),
        );

        lines.join("\n")
    }
}
