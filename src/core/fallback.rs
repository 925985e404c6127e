//! Fallback Generator: synthetic SCL for sessions with a dead channel
//!
//! The scenario decides both arousal flags. Each synthetic walk is then
//! ramped so its own half-window rise agrees with its flag, and every number
//! reported for a fallback session is measured on that walk.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::config::AnalysisConfig;
use crate::core::arousal::{ArousalDetector, HalfStats};
use crate::types::{ArousalPair, ArousalResult, FallbackScenario, Participant, TracePoint};

/// Resting level of each synthetic channel
const BASE_SCL: [f64; 2] = [200.0, 300.0];

/// Probability of a macro jump per step
const MACRO_JUMP_P: f64 = 0.05;
const MACRO_JUMP: f64 = 5.0;

/// Pull toward the drift line per step
const DRIFT_PULL: f64 = 0.02;

/// Skin conductance response pulses added to aroused channels
const PULSE_COUNT: (usize, usize) = (2, 4);
const PULSE_AMPLITUDE: (f64, f64) = (20.0, 60.0);
const PULSE_DECAY: (f64, f64) = (20.0, 40.0);
const PULSE_LEAD: usize = 50;
const PULSE_TAIL: usize = 150;

/// Standard deviation of the extra jitter on participant 1's dashed line
const JITTER_SD: f64 = 2.0;

/// Half-window rise of an aroused walk, above the arousal threshold
const AROUSED_MARGIN: (f64, f64) = (0.02, 0.20);

/// Half-window rise of a calm walk, as a fraction of the arousal threshold
const CALM_FRACTION: (f64, f64) = (0.1, 0.6);

/// Walks regenerated before giving up on calibration
const MAX_ATTEMPTS: usize = 8;

/// Random-walk shape for one arousal state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkParams {
    pub volatility: f64,
    pub drift: (f64, f64),
}

impl WalkParams {
    pub const CALM: WalkParams = WalkParams {
        volatility: 1.2,
        drift: (-30.0, 40.0),
    };

    pub const AROUSED: WalkParams = WalkParams {
        volatility: 2.5,
        drift: (-40.0, 60.0),
    };

    pub fn for_state(aroused: bool) -> WalkParams {
        if aroused {
            Self::AROUSED
        } else {
            Self::CALM
        }
    }
}

/// Scenario plus the data derived from it
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackOutput {
    pub scenario: FallbackScenario,
    pub arousal: ArousalPair,
    pub trace: Vec<TracePoint>,
}

/// Fallback generator
#[derive(Debug, Clone)]
pub struct FallbackGenerator {
    len: usize,
    rate_hz: f64,
    min_valid: f64,
    max_valid: f64,
    threshold: f64,
    detector: ArousalDetector,
}

impl Default for FallbackGenerator {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl FallbackGenerator {
    pub fn new(config: &AnalysisConfig) -> Self {
        let len = (config.analysis_duration_secs * config.fallback_sample_rate_hz).round() as usize;
        Self {
            len: len.max(2),
            rate_hz: config.fallback_sample_rate_hz,
            min_valid: config.scl_min_valid,
            max_valid: config.scl_max_valid,
            threshold: config.arousal_threshold,
            detector: ArousalDetector::new(config),
        }
    }

    /// Uniform choice among the four scenarios
    pub fn pick_scenario<R: Rng + ?Sized>(&self, rng: &mut R) -> FallbackScenario {
        FallbackScenario::ALL[rng.random_range(0..FallbackScenario::ALL.len())]
    }

    /// Pick a scenario and synthesize its data
    pub fn generate_random<R: Rng + ?Sized>(&self, rng: &mut R) -> FallbackOutput {
        let scenario = self.pick_scenario(rng);
        self.generate(scenario, rng)
    }

    /// Synthesize both series for a fixed scenario
    pub fn generate<R: Rng + ?Sized>(&self, scenario: FallbackScenario, rng: &mut R) -> FallbackOutput {
        let times: Vec<f64> = (0..self.len).map(|i| i as f64 / self.rate_hz).collect();
        let series0 = self.series(&times, Participant::P0, scenario.arousal(Participant::P0), rng);
        let series1 = self.series(&times, Participant::P1, scenario.arousal(Participant::P1), rng);

        let trace: Vec<TracePoint> = times
            .into_iter()
            .zip(series0.into_iter().zip(series1))
            .map(|(t, (scl0, scl1))| TracePoint { t, scl0, scl1 })
            .collect();

        let stats = self.detector.trace_stats(&trace);
        let result = |p: Participant| {
            let s = &stats[p.id() as usize];
            ArousalResult::scenario(
                scenario.arousal(p),
                s.mean_first(),
                s.mean_second(),
                s.first_count,
                s.second_count,
            )
        };
        let arousal = ArousalPair::new(result(Participant::P0), result(Participant::P1));

        tracing::info!(
            target: "fallback",
            scenario = scenario.token(),
            points = trace.len(),
            rel0 = arousal.persona0.rel_diff,
            rel1 = arousal.persona1.rel_diff,
            "synthetic SCL generated"
        );

        FallbackOutput {
            scenario,
            arousal,
            trace,
        }
    }

    /// One participant's walk, calibrated to rise in line with `aroused`
    fn series<R: Rng + ?Sized>(
        &self,
        times: &[f64],
        participant: Participant,
        aroused: bool,
        rng: &mut R,
    ) -> Vec<f64> {
        let target = self.target_rise(aroused, rng);
        let mut values = Vec::new();

        for attempt in 1..=MAX_ATTEMPTS {
            values = self.walk(BASE_SCL[participant.id() as usize], aroused, rng);
            if participant == Participant::P1 {
                for v in values.iter_mut().skip(1) {
                    let z: f64 = rng.sample(StandardNormal);
                    *v += z * JITTER_SD;
                }
            }
            self.clamp_all(&mut values);
            self.calibrate(times, &mut values, target);

            if self.agrees(times, &values, aroused) {
                return values;
            }
            tracing::debug!(
                target: "fallback",
                participant = participant.id(),
                attempt,
                "walk disagrees with scenario after calibration, regenerating"
            );
        }

        tracing::warn!(
            target: "fallback",
            participant = participant.id(),
            aroused,
            "synthetic walk could not be calibrated"
        );
        values
    }

    /// Relative half-window rise the walk is ramped to
    fn target_rise<R: Rng + ?Sized>(&self, aroused: bool, rng: &mut R) -> f64 {
        if aroused {
            self.threshold + rng.random_range(AROUSED_MARGIN.0..=AROUSED_MARGIN.1)
        } else {
            self.threshold * rng.random_range(CALM_FRACTION.0..=CALM_FRACTION.1)
        }
    }

    /// Drifting random walk, with response pulses when aroused
    fn walk<R: Rng + ?Sized>(&self, base: f64, aroused: bool, rng: &mut R) -> Vec<f64> {
        let params = WalkParams::for_state(aroused);
        let n = self.len;

        let target = base + rng.random_range(params.drift.0..=params.drift.1);
        let drift_step = (target - base) / n as f64;

        let mut values = Vec::with_capacity(n);
        let mut current = base;
        values.push(current);

        for i in 1..n {
            let z: f64 = rng.sample(StandardNormal);
            let mut change = z * params.volatility;
            if rng.random_bool(MACRO_JUMP_P) {
                change += rng.random_range(-MACRO_JUMP..=MACRO_JUMP);
            }
            let expected = base + drift_step * i as f64;
            current += change + (expected - current) * DRIFT_PULL;
            values.push(current);
        }

        if aroused {
            add_pulses(&mut values, rng);
        }
        values
    }

    /// Add `k·t/span` with k chosen so mean_second = (1 + target)·mean_first
    ///
    /// Half means are linear in k while the accepted set is unchanged, so one
    /// unit ramp measures the slope of each mean.
    fn calibrate(&self, times: &[f64], values: &mut [f64], target: f64) {
        let span = match times.last() {
            Some(&span) if span > 0.0 => span,
            _ => return,
        };
        let ramp: Vec<f64> = times.iter().map(|t| t / span).collect();

        let before = self.channel_stats(times, values);
        let unit: Vec<f64> = values.iter().zip(&ramp).map(|(v, r)| v + r).collect();
        let after = self.channel_stats(times, &unit);

        let slope_first = after.mean_first() - before.mean_first();
        let slope_second = after.mean_second() - before.mean_second();
        let denom = slope_second - (1.0 + target) * slope_first;
        if denom.abs() < f64::EPSILON {
            return;
        }

        let k = ((1.0 + target) * before.mean_first() - before.mean_second()) / denom;
        for (v, r) in values.iter_mut().zip(&ramp) {
            *v += k * r;
        }
        self.clamp_all(values);
    }

    /// Whether the walk's measured rise matches the arousal state
    fn agrees(&self, times: &[f64], values: &[f64], aroused: bool) -> bool {
        let stats = self.channel_stats(times, values);
        let m1 = stats.mean_first();
        if stats.first_count == 0 || stats.second_count == 0 || m1 <= 0.0 {
            return false;
        }
        let rise = (stats.mean_second() - m1) / m1;
        if aroused {
            rise >= self.threshold
        } else {
            (0.0..self.threshold).contains(&rise)
        }
    }

    fn channel_stats(&self, times: &[f64], values: &[f64]) -> HalfStats {
        let [stats, _] = self
            .detector
            .accumulate(times.iter().zip(values).map(|(&t, &v)| (t, v, v)));
        stats
    }

    fn clamp_all(&self, values: &mut [f64]) {
        for v in values.iter_mut() {
            *v = v.clamp(self.min_valid, self.max_valid);
        }
    }
}

/// Add 2-4 pulses shaped A·(dt/τ)·e^(1-dt/τ)
fn add_pulses<R: Rng + ?Sized>(values: &mut [f64], rng: &mut R) {
    let n = values.len();
    let lead = PULSE_LEAD.min(n / 8);
    let last = n.saturating_sub(PULSE_TAIL).max(lead);
    if lead >= n {
        return;
    }

    let count = rng.random_range(PULSE_COUNT.0..=PULSE_COUNT.1);
    for _ in 0..count {
        let peak = rng.random_range(lead..=last.min(n - 1));
        let amplitude = rng.random_range(PULSE_AMPLITUDE.0..=PULSE_AMPLITUDE.1);
        let decay = rng.random_range(PULSE_DECAY.0..=PULSE_DECAY.1);

        for (dt, v) in values[peak..].iter_mut().enumerate() {
            let x = dt as f64 / decay;
            let pulse = amplitude * x * (1.0 - x).exp();
            if pulse >= 0.1 {
                *v += pulse * rng.random_range(0.9..=1.1);
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
