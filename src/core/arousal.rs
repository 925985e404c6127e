//! Arousal Trend Detector: compares mean SCL between the two half-windows
//!
//! Per participant, independently:
//! - reject readings outside [scl_min_valid, scl_max_valid]
//! - reject readings more than scl_max_step from the last accepted one
//! - arousal = (mean_second - mean_first) / mean_first >= threshold

use crate::config::AnalysisConfig;
use crate::types::{ArousalPair, ArousalResult, DynamicWindow, Participant, TracePoint};

/// Sum/count of accepted readings in each half for one participant
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HalfStats {
    pub first_sum: f64,
    pub first_count: usize,
    pub second_sum: f64,
    pub second_count: usize,
    last_accepted: Option<f64>,
}

impl HalfStats {
    pub fn mean_first(&self) -> f64 {
        if self.first_count == 0 {
            0.0
        } else {
            self.first_sum / self.first_count as f64
        }
    }

    pub fn mean_second(&self) -> f64 {
        if self.second_count == 0 {
            0.0
        } else {
            self.second_sum / self.second_count as f64
        }
    }
}

/// Arousal trend detector
#[derive(Debug, Clone)]
pub struct ArousalDetector {
    delay: f64,
    duration: f64,
    half: f64,
    min_valid: f64,
    max_valid: f64,
    max_step: f64,
    threshold: f64,
}

impl Default for ArousalDetector {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl ArousalDetector {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            delay: config.start_delay_secs,
            duration: config.analysis_duration_secs,
            half: config.half_duration_secs(),
            min_valid: config.scl_min_valid,
            max_valid: config.scl_max_valid,
            max_step: config.scl_max_step,
            threshold: config.arousal_threshold,
        }
    }

    /// Detect arousal over a dynamic window (channels assumed alive)
    pub fn detect(&self, window: &DynamicWindow<'_>) -> ArousalPair {
        let start = window.start_time();
        let stats = self.accumulate(
            window
                .samples()
                .iter()
                .map(|s| (s.timestamp - start, s.scl0, s.scl1)),
        );
        ArousalPair::new(
            self.result_for(Participant::P0, &stats[0]),
            self.result_for(Participant::P1, &stats[1]),
        )
    }

    /// Half-window statistics over a relative-time trace
    pub fn trace_stats(&self, trace: &[TracePoint]) -> [HalfStats; 2] {
        self.accumulate(trace.iter().map(|p| (p.t, p.scl0, p.scl1)))
    }

    /// Accumulate accepted readings from (elapsed, scl0, scl1) triples
    pub fn accumulate(&self, points: impl Iterator<Item = (f64, f64, f64)>) -> [HalfStats; 2] {
        let mut stats = [HalfStats::default(); 2];

        for (elapsed, scl0, scl1) in points {
            if elapsed < self.delay || elapsed > self.delay + self.duration {
                continue;
            }
            let t = elapsed - self.delay;

            for (acc, raw) in stats.iter_mut().zip([scl0, scl1]) {
                if !self.accepts(acc.last_accepted, raw) {
                    continue;
                }
                if t <= self.half {
                    acc.first_sum += raw;
                    acc.first_count += 1;
                } else {
                    acc.second_sum += raw;
                    acc.second_count += 1;
                }
                acc.last_accepted = Some(raw);
            }
        }
        stats
    }

    /// Domain + step filter against the last accepted reading
    pub fn accepts(&self, last_accepted: Option<f64>, raw: f64) -> bool {
        if !(self.min_valid..=self.max_valid).contains(&raw) {
            return false;
        }
        match last_accepted {
            Some(last) => (raw - last).abs() <= self.max_step,
            None => true,
        }
    }

    fn result_for(&self, participant: Participant, stats: &HalfStats) -> ArousalResult {
        let m1 = stats.mean_first();
        let m2 = stats.mean_second();

        // Non-positive first mean would make rel_diff undefined
        if stats.first_count == 0 || stats.second_count == 0 || m1 <= 0.0 {
            tracing::warn!(
                target: "arousal",
                participant = participant.id(),
                first = stats.first_count,
                second = stats.second_count,
                "half-window without valid samples, arousal forced off"
            );
            return ArousalResult::missing_half(m1, m2, stats.first_count, stats.second_count);
        }

        let result = ArousalResult::computed(
            m1,
            m2,
            stats.first_count,
            stats.second_count,
            self.threshold,
        );
        tracing::debug!(
            target: "arousal",
            participant = participant.id(),
            m1,
            m2,
            delta = result.delta,
            rel = result.rel_diff,
            arousal = result.arousal,
            "trend computed"
        );
        result
    }
}

// =============================================================================
// TESTS
// =============================================================================
