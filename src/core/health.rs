//! Sensor Health Monitor: flags dead conductance channels
//!
//! A channel is dead when at least `dead_fraction` of its raw readings sit
//! below `dead_floor`. Any dead channel routes the session to fallback.

use crate::config::AnalysisConfig;
use crate::types::{DynamicWindow, Participant, Sample, SensorHealth};

/// Sensor health monitor
#[derive(Debug, Clone, Copy)]
pub struct SensorHealthMonitor {
    floor: f64,
    dead_fraction: f64,
}

impl Default for SensorHealthMonitor {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl SensorHealthMonitor {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            floor: config.dead_floor,
            dead_fraction: config.dead_fraction,
        }
    }

    /// Fraction of readings below the floor (0 for no samples)
    pub fn below_floor_fraction(&self, samples: &[Sample], participant: Participant) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let dead = samples
            .iter()
            .filter(|s| s.scl_of(participant) < self.floor)
            .count();
        dead as f64 / samples.len() as f64
    }

    /// Classify both channels over the window
    pub fn check(&self, window: &DynamicWindow<'_>) -> SensorHealth {
        let samples = window.samples();
        let f0 = self.below_floor_fraction(samples, Participant::P0);
        let f1 = self.below_floor_fraction(samples, Participant::P1);

        let health = SensorHealth::new(f0, f1, f0 < self.dead_fraction, f1 < self.dead_fraction);

        if health.all_alive() {
            tracing::debug!(target: "health", dead0 = f0, dead1 = f1, "sensors alive");
        } else {
            tracing::warn!(
                target: "health",
                dead0 = f0,
                dead1 = f1,
                reason = health.reason.code(),
                "dead conductance channel"
            );
        }
        health
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReasonCode;

    /// 100 samples, the first `dead0`/`dead1` of each channel below the floor
    fn window_with_dead(dead0: usize, dead1: usize) -> Vec<Sample> {
        (0..100)
            .map(|i| {
                let scl0 = if i < dead0 { 5.0 } else { 200.0 };
                let scl1 = if i < dead1 { 5.0 } else { 300.0 };
                Sample::scl(i as f64 * 0.1, scl0, scl1)
            })
            .collect()
    }

    #[test]
    fn test_all_alive() {
        let samples = window_with_dead(0, 0);
        let health = SensorHealthMonitor::default().check(&DynamicWindow::new(&samples, 0));

        assert!(health.all_alive());
        assert_eq!(health.reason, ReasonCode::R201_SENSORS_ALIVE);
    }

    #[test]
    fn test_twenty_percent_is_dead() {
        let samples = window_with_dead(20, 0);
        let health = SensorHealthMonitor::default().check(&DynamicWindow::new(&samples, 0));

        assert!(!health.alive0);
        assert!(health.alive1);
        assert_eq!(health.reason, ReasonCode::R202_SENSOR_DEAD_P0);
        assert_eq!(health.dead_participants(), vec![Participant::P0]);
    }

    #[test]
    fn test_nineteen_percent_is_alive() {
        let samples = window_with_dead(0, 19);
        let health = SensorHealthMonitor::default().check(&DynamicWindow::new(&samples, 0));

        assert!(health.all_alive());
        assert!((health.dead_fraction1 - 0.19).abs() < 1e-12);
    }

    #[test]
    fn test_both_dead() {
        let samples = window_with_dead(100, 50);
        let health = SensorHealthMonitor::default().check(&DynamicWindow::new(&samples, 0));
        assert_eq!(health.reason, ReasonCode::R204_SENSORS_DEAD_BOTH);
    }

    #[test]
    fn test_floor_is_exclusive() {
        let samples = vec![Sample::scl(0.0, 10.0, 9.99)];
        let monitor = SensorHealthMonitor::default();
        assert_eq!(monitor.below_floor_fraction(&samples, Participant::P0), 0.0);
        assert_eq!(monitor.below_floor_fraction(&samples, Participant::P1), 1.0);
    }
}
