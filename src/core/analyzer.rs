//! Analyzer: runs the whole scoring pipeline over one session
//!
//! segment → sensor health → (arousal | fallback) → score → attribute → tier
//!
//! The only randomness is the fallback scenario and its synthetic series, drawn
//! from the caller's RNG so tests can pin it.

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::config::AnalysisConfig;
use crate::core::arousal::ArousalDetector;
use crate::core::attribution::{classify, WeakLinkAttributor};
use crate::core::fallback::FallbackGenerator;
use crate::core::health::SensorHealthMonitor;
use crate::core::scorer::CompatibilityScorer;
use crate::core::segmenter::PhaseSegmenter;
use crate::error::AnalysisError;
use crate::types::{DynamicWindow, Sample, SclAverages, ScoreResult, TracePoint};

/// Pipeline facade
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
    segmenter: PhaseSegmenter,
    health: SensorHealthMonitor,
    detector: ArousalDetector,
    fallback: FallbackGenerator,
    scorer: CompatibilityScorer,
    attributor: WeakLinkAttributor,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            segmenter: PhaseSegmenter::new(&config),
            health: SensorHealthMonitor::new(&config),
            detector: ArousalDetector::new(&config),
            fallback: FallbackGenerator::new(&config),
            scorer: CompatibilityScorer::new(&config),
            attributor: WeakLinkAttributor::new(),
            config,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyse with thread-local entropy for the fallback path
    pub fn analyze(&self, session: &[Sample]) -> Result<ScoreResult, AnalysisError> {
        self.analyze_with_rng(session, &mut rand::rng())
    }

    /// Analyse with an injected RNG
    pub fn analyze_with_rng<R: Rng + ?Sized>(
        &self,
        session: &[Sample],
        rng: &mut R,
    ) -> Result<ScoreResult, AnalysisError> {
        let segmentation = self.segmenter.segment(session)?;
        let window = segmentation.window;
        let health = self.health.check(&window);

        let (arousal, trace, fallback_scenario) = if health.all_alive() {
            (self.detector.detect(&window), window_trace(&window), None)
        } else {
            let out = self.fallback.generate_random(rng);
            (out.arousal, out.trace, Some(out.scenario))
        };

        let (compatibility, sub_scores) = self.scorer.score(&segmentation.snapshot, &arousal);
        let weak_link = self.attributor.attribute(&arousal, sub_scores.scl);
        let risk_tier = classify(compatibility);
        let averages = self.trace_averages(&trace);

        tracing::info!(
            target: "analyzer",
            samples = session.len(),
            window = window.len(),
            compatibility,
            tier = risk_tier.number(),
            weak_link = weak_link.id,
            fallback = fallback_scenario.map(|s| s.token()),
            "session analysed"
        );

        Ok(ScoreResult {
            computed_at: chrono::Utc::now(),
            compatibility,
            risk_tier,
            weak_link,
            arousal,
            sub_scores,
            snapshot: segmentation.snapshot,
            health,
            fallback_scenario,
            trace,
            averages,
            sample_count: session.len(),
            session_digest: session_digest(session),
        })
    }

    /// Mean SCL per participant over in-domain trace points
    pub fn trace_averages(&self, trace: &[TracePoint]) -> SclAverages {
        let domain = self.config.scl_min_valid..=self.config.scl_max_valid;
        let mean = |values: Vec<f64>| {
            if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            }
        };
        SclAverages {
            scl0: mean(trace.iter().map(|p| p.scl0).filter(|v| domain.contains(v)).collect()),
            scl1: mean(trace.iter().map(|p| p.scl1).filter(|v| domain.contains(v)).collect()),
        }
    }
}

/// Dynamic window as relative-time trace points
fn window_trace(window: &DynamicWindow<'_>) -> Vec<TracePoint> {
    let start = window.start_time();
    window
        .samples()
        .iter()
        .map(|s| TracePoint {
            t: s.timestamp - start,
            scl0: s.scl0,
            scl1: s.scl1,
        })
        .collect()
}

/// SHA-256 of the session samples (hex, deterministic)
pub fn session_digest(session: &[Sample]) -> String {
    let mut hasher = Sha256::new();

    for sample in session {
        hasher.update(sample.timestamp.to_le_bytes());
        hasher.update(sample.scl0.to_le_bytes());
        hasher.update(sample.scl1.to_le_bytes());
        hasher.update(sample.slider0.to_le_bytes());
        hasher.update(sample.slider1.to_le_bytes());
        for labels in [&sample.relations0, &sample.relations1] {
            for label in labels {
                hasher.update(label.as_bytes());
                hasher.update([0u8]); // Separator
            }
            hasher.update([0x1eu8]);
        }
    }

    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
