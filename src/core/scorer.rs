//! Compatibility Scorer: buttons, sliders and SCL pattern combined
//!
//! - buttons = Jaccard overlap of the relation sets
//! - slider = 1 - (|v0 - v1| - tolerance) / 100, on percentage scale
//! - scl = 1 (both calm), 0 (both aroused), 0.5 minus asymmetry otherwise
//!
//! compatibility = round(100 × weighted sum), clamped to 0..=100

use std::collections::BTreeSet;

use crate::config::AnalysisConfig;
use crate::types::{ArousalPair, Relation, StaticSnapshot, SubScores};

/// Compatibility scorer
#[derive(Debug, Clone)]
pub struct CompatibilityScorer {
    slider_max_raw: i32,
    slider_tolerance_pct: f64,
    empty_buttons_score: f64,
    weight_scl: f64,
    weight_slider: f64,
    weight_buttons: f64,
}

impl Default for CompatibilityScorer {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl CompatibilityScorer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            slider_max_raw: i32::from(config.slider_max_raw),
            slider_tolerance_pct: config.slider_tolerance_pct,
            empty_buttons_score: config.empty_buttons_score,
            weight_scl: config.weight_scl,
            weight_slider: config.weight_slider,
            weight_buttons: config.weight_buttons,
        }
    }

    /// Jaccard overlap of the two selections
    pub fn button_score(&self, set0: &BTreeSet<Relation>, set1: &BTreeSet<Relation>) -> f64 {
        let union = set0.union(set1).count();
        if union == 0 {
            return self.empty_buttons_score;
        }
        let intersection = set0.intersection(set1).count();
        intersection as f64 / union as f64
    }

    /// Raw value at or past either end of the scale
    pub fn is_broken_slider(&self, raw: i32) -> bool {
        raw <= 0 || raw >= self.slider_max_raw
    }

    /// Raw slider to percentage
    pub fn slider_pct(&self, raw: i32) -> f64 {
        f64::from(raw) * 100.0 / f64::from(self.slider_max_raw)
    }

    /// Slider agreement; a broken slider borrows the other's value
    pub fn slider_score(&self, raw0: i32, raw1: i32) -> f64 {
        let (raw0, raw1) = match (self.is_broken_slider(raw0), self.is_broken_slider(raw1)) {
            (true, true) => return 1.0,
            (true, false) => (raw1, raw1),
            (false, true) => (raw0, raw0),
            (false, false) => (raw0, raw1),
        };

        let diff = (self.slider_pct(raw0) - self.slider_pct(raw1)).abs();
        let discrepancy = (diff - self.slider_tolerance_pct).clamp(0.0, 100.0);
        1.0 - discrepancy / 100.0
    }

    /// SCL pattern score
    pub fn scl_score(&self, arousal: &ArousalPair) -> f64 {
        match arousal.flags() {
            (true, true) => 0.0,
            (false, false) => 1.0,
            _ => {
                let asymmetry =
                    (arousal.persona0.rel_diff - arousal.persona1.rel_diff).abs().clamp(0.0, 1.0);
                (0.5 - 0.5 * asymmetry).clamp(0.0, 1.0)
            }
        }
    }

    /// All three factors
    pub fn sub_scores(&self, snapshot: &StaticSnapshot, arousal: &ArousalPair) -> SubScores {
        SubScores {
            buttons: self.button_score(&snapshot.relations0, &snapshot.relations1),
            slider: self.slider_score(snapshot.slider0, snapshot.slider1),
            scl: self.scl_score(arousal),
        }
    }

    /// Weighted percentage, ties rounded to even
    pub fn combine(&self, sub: &SubScores) -> u8 {
        let weighted = self.weight_scl * sub.scl
            + self.weight_slider * sub.slider
            + self.weight_buttons * sub.buttons;
        let percent = (100.0 * weighted).round_ties_even();
        if percent.is_nan() {
            return 0;
        }
        percent.clamp(0.0, 100.0) as u8
    }

    /// Compatibility percentage and the sub-scores behind it
    pub fn score(&self, snapshot: &StaticSnapshot, arousal: &ArousalPair) -> (u8, SubScores) {
        let sub = self.sub_scores(snapshot, arousal);
        let compatibility = self.combine(&sub);

        tracing::debug!(
            target: "scorer",
            buttons = sub.buttons,
            slider = sub.slider,
            scl = sub.scl,
            compatibility,
            "compatibility scored"
        );
        (compatibility, sub)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ArousalResult, ReasonCode, Sample};

    fn set(labels: &[&str]) -> BTreeSet<Relation> {
        Relation::parse_set(labels)
    }

    fn pair(a0: bool, rel0: f64, a1: bool, rel1: f64) -> ArousalPair {
        let r = |arousal: bool, rel: f64| ArousalResult {
            mean_first: 100.0,
            mean_second: 100.0 * (1.0 + rel),
            delta: 100.0 * rel,
            rel_diff: rel,
            arousal,
            fake: None,
            count_first: 10,
            count_second: 10,
            reason: ReasonCode::R301_AROUSAL_COMPUTED,
        };
        ArousalPair::new(r(a0, rel0), r(a1, rel1))
    }

    fn snapshot(r0: &[&str], r1: &[&str], s0: i32, s1: i32) -> StaticSnapshot {
        let sample = Sample::scl(0.0, 100.0, 100.0)
            .with_relations(r0, r1)
            .with_sliders(s0, s1);
        StaticSnapshot::from_sample(0, &sample, ReasonCode::R111_SNAPSHOT_SESSION)
    }

    #[test]
    fn test_button_jaccard() {
        let scorer = CompatibilityScorer::default();
        assert_eq!(
            scorer.button_score(&set(&["FAMILY", "ROMANTIC"]), &set(&["FAMILY"])),
            0.5
        );
        assert_eq!(scorer.button_score(&set(&["FAMILY"]), &set(&["FAMILY"])), 1.0);
        assert_eq!(scorer.button_score(&set(&["FAMILY"]), &set(&["ROMANTIC"])), 0.0);
    }

    #[test]
    fn test_button_empty_policy() {
        let scorer = CompatibilityScorer::default();
        assert_eq!(scorer.button_score(&set(&[]), &set(&[])), 0.0);

        let neutral = CompatibilityScorer::new(&AnalysisConfig {
            empty_buttons_score: 0.5,
            ..AnalysisConfig::default()
        });
        assert_eq!(neutral.button_score(&set(&[]), &set(&[])), 0.5);
    }

    #[test]
    fn test_button_symmetry() {
        let scorer = CompatibilityScorer::default();
        let a = set(&["FAMILY", "FRIENDSHIP", "COHABITATION"]);
        let b = set(&["FRIENDSHIP", "PROFESSIONAL"]);
        assert_eq!(scorer.button_score(&a, &b), scorer.button_score(&b, &a));
    }

    #[test]
    fn test_identical_sliders() {
        assert_eq!(CompatibilityScorer::default().slider_score(512, 512), 1.0);
    }

    #[test]
    fn test_both_sliders_broken() {
        let scorer = CompatibilityScorer::default();
        assert_eq!(scorer.slider_score(1023, 1023), 1.0);
        assert_eq!(scorer.slider_score(0, 1023), 1.0);
        assert_eq!(scorer.slider_score(-4, 2000), 1.0);
    }

    #[test]
    fn test_one_slider_broken_borrows_other() {
        let scorer = CompatibilityScorer::default();
        assert_eq!(scorer.slider_score(0, 300), 1.0);
        assert_eq!(scorer.slider_score(700, 1023), 1.0);
    }

    #[test]
    fn test_slider_tolerance() {
        let scorer = CompatibilityScorer::default();
        // 10 raw ≈ 0.98% apart, inside the 2% tolerance
        assert_eq!(scorer.slider_score(500, 510), 1.0);
        // 1 vs 1022 ≈ 99.8% apart
        let far = scorer.slider_score(1, 1022);
        let expected = 1.0 - ((1021.0 * 100.0 / 1023.0) - 2.0) / 100.0;
        assert!((far - expected).abs() < 1e-12);
        assert!(far > 0.0 && far < 0.05);
    }

    #[test]
    fn test_scl_extremes() {
        let scorer = CompatibilityScorer::default();
        assert_eq!(scorer.scl_score(&pair(true, 0.2, true, 0.3)), 0.0);
        assert_eq!(scorer.scl_score(&pair(false, 0.0, false, -0.1)), 1.0);
    }

    #[test]
    fn test_scl_lone_arousal() {
        let scorer = CompatibilityScorer::default();
        let s = scorer.scl_score(&pair(true, 0.10, false, 0.0));
        assert!((s - 0.45).abs() < 1e-12);

        // Asymmetry saturates at 1
        assert_eq!(scorer.scl_score(&pair(false, -0.5, true, 1.5)), 0.0);
    }

    #[test]
    fn test_weighted_combination() {
        let scorer = CompatibilityScorer::default();
        let (comp, sub) = scorer.score(
            &snapshot(&["FAMILY"], &["FAMILY"], 512, 512),
            &pair(false, 0.0, false, 0.0),
        );
        assert_eq!(sub, SubScores { buttons: 1.0, slider: 1.0, scl: 1.0 });
        assert_eq!(comp, 100);

        let (comp, _) = scorer.score(
            &snapshot(&["FAMILY"], &["ROMANTIC"], 1, 1022),
            &pair(true, 0.2, true, 0.2),
        );
        assert_eq!(comp, 1);
    }

    #[test]
    fn test_round_half_to_even() {
        let scorer = CompatibilityScorer::default();
        let sub = SubScores { buttons: 0.5, slider: 0.0, scl: 0.0 };
        // 12.5 rounds to 12
        assert_eq!(scorer.combine(&sub), 12);
        let sub = SubScores { buttons: 0.5, slider: 0.0, scl: 0.5 };
        // 37.5 rounds to 38
        assert_eq!(scorer.combine(&sub), 38);
    }

    #[test]
    fn test_swap_invariance() {
        let scorer = CompatibilityScorer::default();
        let snap = snapshot(&["FAMILY", "ROMANTIC"], &["FAMILY"], 200, 700);
        let arousal = pair(true, 0.3, false, 0.01);

        let (a, _) = scorer.score(&snap, &arousal);
        let (b, _) = scorer.score(&snap.swapped(), &arousal.swapped());
        assert_eq!(a, b);
    }
}
