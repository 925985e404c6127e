//! Phase Segmenter: splits a session into configuration and dynamic window
//!
//! - Phase 1 = samples before the first timestamp gap > 2s
//! - Phase 2 = boundary sample onward (the dynamic window)
//! - No gap: the whole session is the dynamic window

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::types::{DynamicWindow, ReasonCode, Sample, Segmentation, StaticSnapshot};

/// Phase segmenter
#[derive(Debug, Clone, Copy)]
pub struct PhaseSegmenter {
    gap_secs: f64,
}

impl Default for PhaseSegmenter {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl PhaseSegmenter {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            gap_secs: config.phase_gap_secs,
        }
    }

    /// Index of the first sample that follows a gap larger than the threshold
    pub fn find_boundary(&self, session: &[Sample]) -> Option<usize> {
        session
            .windows(2)
            .position(|pair| pair[1].timestamp - pair[0].timestamp > self.gap_secs)
            .map(|i| i + 1)
    }

    /// Split a session into its static snapshot and dynamic window
    pub fn segment<'a>(&self, session: &'a [Sample]) -> Result<Segmentation<'a>, AnalysisError> {
        if session.is_empty() {
            return Err(AnalysisError::EmptySession);
        }

        let boundary = self.find_boundary(session);

        let (snapshot, window, reason) = match boundary {
            Some(split) => {
                let phase1 = &session[..split];
                let snapshot = match last_with_selection(phase1) {
                    Some(i) => StaticSnapshot::from_sample(
                        i,
                        &session[i],
                        ReasonCode::R110_SNAPSHOT_PHASE1,
                    ),
                    None => session_snapshot(session),
                };
                tracing::debug!(
                    target: "segmenter",
                    boundary = split,
                    phase1 = split,
                    phase2 = session.len() - split,
                    snapshot_index = snapshot.source_index,
                    "phase split"
                );
                (
                    snapshot,
                    DynamicWindow::new(&session[split..], split),
                    ReasonCode::R101_PHASE_SPLIT_AT_GAP,
                )
            }
            None => {
                let snapshot = session_snapshot(session);
                tracing::warn!(
                    target: "segmenter",
                    samples = session.len(),
                    snapshot_index = snapshot.source_index,
                    "no phase gap, analysing whole session"
                );
                (
                    snapshot,
                    DynamicWindow::new(session, 0),
                    ReasonCode::R102_PHASE_NO_GAP,
                )
            }
        };

        if snapshot.defaulted {
            tracing::warn!(
                target: "segmenter",
                snapshot_index = snapshot.source_index,
                "no relations selected, using default relation"
            );
        }

        Ok(Segmentation {
            snapshot,
            window,
            boundary,
            reason,
        })
    }
}

/// Most recent sample with any selection
fn last_with_selection(samples: &[Sample]) -> Option<usize> {
    samples.iter().rposition(Sample::has_selection)
}

/// Whole-session backward search, falling back to the last sample
fn session_snapshot(session: &[Sample]) -> StaticSnapshot {
    match last_with_selection(session) {
        Some(i) => StaticSnapshot::from_sample(i, &session[i], ReasonCode::R111_SNAPSHOT_SESSION),
        None => {
            let last = session.len() - 1;
            StaticSnapshot::from_sample(
                last,
                &session[last],
                ReasonCode::R112_SNAPSHOT_LAST_SAMPLE,
            )
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Relation;

    fn sample(t: f64) -> Sample {
        Sample::scl(t, 100.0, 100.0)
    }

    #[test]
    fn test_empty_session() {
        let seg = PhaseSegmenter::default();
        assert_eq!(seg.segment(&[]).unwrap_err(), AnalysisError::EmptySession);
    }

    #[test]
    fn test_split_at_first_gap() {
        let session = vec![
            sample(0.0).with_relations(&["FAMILY"], &["FAMILY"]),
            sample(0.5),
            sample(5.0),
            sample(5.5),
            sample(9.0),
        ];
        let result = PhaseSegmenter::default().segment(&session).unwrap();

        assert_eq!(result.boundary, Some(2));
        assert_eq!(result.reason, ReasonCode::R101_PHASE_SPLIT_AT_GAP);
        assert_eq!(result.window.len(), 3);
        assert_eq!(result.window.start_time(), 5.0);
        assert_eq!(result.snapshot.source_index, 0);
        assert_eq!(result.snapshot.reason, ReasonCode::R110_SNAPSHOT_PHASE1);
    }

    #[test]
    fn test_gap_of_exactly_threshold_is_not_a_boundary() {
        let session = vec![sample(0.0), sample(2.0), sample(4.0)];
        let result = PhaseSegmenter::default().segment(&session).unwrap();

        assert_eq!(result.boundary, None);
        assert_eq!(result.window.len(), 3);
    }

    #[test]
    fn test_no_gap_uses_last_selection_in_session() {
        let session = vec![
            sample(0.0).with_relations(&["ROMANTIC"], &[]),
            sample(0.1).with_relations(&[], &["FAMILY"]),
            sample(0.2),
        ];
        let result = PhaseSegmenter::default().segment(&session).unwrap();

        assert_eq!(result.reason, ReasonCode::R102_PHASE_NO_GAP);
        assert_eq!(result.snapshot.source_index, 1);
        assert_eq!(result.snapshot.reason, ReasonCode::R111_SNAPSHOT_SESSION);
        assert!(result.snapshot.relations1.contains(&Relation::Family));
    }

    #[test]
    fn test_phase1_without_selection_falls_back_to_session() {
        let session = vec![
            sample(0.0),
            sample(0.5),
            sample(10.0).with_relations(&["FRIENDSHIP"], &["FRIENDSHIP"]),
            sample(10.5),
        ];
        let result = PhaseSegmenter::default().segment(&session).unwrap();

        assert_eq!(result.boundary, Some(2));
        assert_eq!(result.snapshot.source_index, 2);
        assert_eq!(result.snapshot.reason, ReasonCode::R111_SNAPSHOT_SESSION);
    }

    #[test]
    fn test_phase1_prefers_latest_selection() {
        let session = vec![
            sample(0.0).with_relations(&["ROMANTIC"], &["ROMANTIC"]),
            sample(0.5).with_relations(&["FAMILY"], &[]),
            sample(1.0),
            sample(8.0).with_relations(&["PROFESSIONAL"], &["PROFESSIONAL"]),
        ];
        let result = PhaseSegmenter::default().segment(&session).unwrap();

        assert_eq!(result.snapshot.source_index, 1);
        assert!(result.snapshot.relations0.contains(&Relation::Family));
    }

    #[test]
    fn test_no_selection_anywhere_defaults() {
        let session = vec![sample(0.0).with_sliders(100, 200), sample(0.1).with_sliders(300, 400)];
        let result = PhaseSegmenter::default().segment(&session).unwrap();

        assert_eq!(result.snapshot.source_index, 1);
        assert_eq!(result.snapshot.reason, ReasonCode::R112_SNAPSHOT_LAST_SAMPLE);
        assert!(result.snapshot.defaulted);
        assert_eq!(result.snapshot.slider0, 300);
        assert!(result.snapshot.relations0.contains(&Relation::Circumstantial));
    }

    #[test]
    fn test_configurable_gap() {
        let config = AnalysisConfig {
            phase_gap_secs: 0.3,
            ..AnalysisConfig::default()
        };
        let session = vec![sample(0.0), sample(0.1), sample(0.5)];
        let result = PhaseSegmenter::new(&config).segment(&session).unwrap();
        assert_eq!(result.boundary, Some(2));
    }
}
