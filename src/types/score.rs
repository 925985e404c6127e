//! Score records: sub-scores, weak link and the final result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    ArousalPair, FallbackScenario, Participant, ReasonCode, RiskTier, SensorHealth,
    StaticSnapshot, TracePoint,
};

/// The three compatibility factors, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub buttons: f64,
    pub slider: f64,
    pub scl: f64,
}

/// Participant blamed for an unbalanced SCL pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeakLink {
    /// -1 = none, otherwise participant id
    pub id: i8,
    pub name: String,
    pub reason: ReasonCode,
}

impl WeakLink {
    pub fn none(reason: ReasonCode) -> Self {
        Self {
            id: -1,
            name: "NONE".to_string(),
            reason,
        }
    }

    pub fn named(participant: Participant) -> Self {
        Self {
            id: participant.id(),
            name: participant.to_string(),
            reason: ReasonCode::R401_WEAK_LINK_UNBALANCED,
        }
    }

    pub fn participant(&self) -> Option<Participant> {
        match self.id {
            0 => Some(Participant::P0),
            1 => Some(Participant::P1),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        self.id < 0
    }
}

/// Mean SCL per participant over the rendered trace
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SclAverages {
    pub scl0: f64,
    pub scl1: f64,
}

/// Final result of one session analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    pub computed_at: DateTime<Utc>,
    /// 0..=100
    pub compatibility: u8,
    pub risk_tier: RiskTier,
    pub weak_link: WeakLink,
    pub arousal: ArousalPair,
    pub sub_scores: SubScores,
    pub snapshot: StaticSnapshot,
    pub health: SensorHealth,
    /// Set when synthetic data replaced the measured window
    pub fallback_scenario: Option<FallbackScenario>,
    /// SCL series for rendering (synthetic on the fallback path)
    pub trace: Vec<TracePoint>,
    pub averages: SclAverages,
    pub sample_count: usize,
    /// SHA-256 of the analysed session (hex)
    pub session_digest: String,
}

impl ScoreResult {
    pub fn is_fallback(&self) -> bool {
        self.fallback_scenario.is_some()
    }

    /// Recovered conditions met on the way to this result, in pipeline order
    pub fn recoveries(&self) -> Vec<ReasonCode> {
        [
            self.snapshot.reason,
            self.health.reason,
            self.arousal.persona0.reason,
            self.arousal.persona1.reason,
        ]
        .into_iter()
        .filter(ReasonCode::is_recovery)
        .fold(Vec::new(), |mut acc, r| {
            if !acc.contains(&r) {
                acc.push(r);
            }
            acc
        })
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "compatibility={}% | tier={} | weak_link={} | arousal={}/{} | fallback={}",
            self.compatibility,
            self.risk_tier.number(),
            self.weak_link.id,
            self.arousal.persona0.arousal,
            self.arousal.persona1.arousal,
            self.fallback_scenario
                .map(|s| s.token().to_string())
                .unwrap_or_else(|| "none".to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weak_link_none() {
        let w = WeakLink::none(ReasonCode::R402_NO_WEAK_LINK_EXTREME);
        assert_eq!(w.id, -1);
        assert!(w.is_none());
        assert_eq!(w.participant(), None);
    }

    #[test]
    fn test_weak_link_named() {
        let w = WeakLink::named(Participant::P1);
        assert_eq!(w.id, 1);
        assert_eq!(w.name, "PARTICIPANT 1");
        assert_eq!(w.participant(), Some(Participant::P1));
        assert_eq!(w.reason, ReasonCode::R401_WEAK_LINK_UNBALANCED);
    }
}
