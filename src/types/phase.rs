//! Phase model: the static configuration instant and the dynamic window
//!
//! - StaticSnapshot = the committed button/slider configuration
//! - DynamicWindow = the time-varying portion used for SCL trends

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{ReasonCode, Relation, Sample};

/// Button + slider configuration the participants committed to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticSnapshot {
    /// Index of the source sample in the session
    pub source_index: usize,
    pub timestamp: f64,
    pub relations0: BTreeSet<Relation>,
    pub relations1: BTreeSet<Relation>,
    pub slider0: i32,
    pub slider1: i32,
    /// Both selections were empty and replaced by the default relation
    pub defaulted: bool,
    /// Where the snapshot came from
    pub reason: ReasonCode,
}

impl StaticSnapshot {
    /// Build from a session sample; empty/empty selections become the default relation
    pub fn from_sample(index: usize, sample: &Sample, reason: ReasonCode) -> Self {
        let mut relations0 = Relation::parse_set(&sample.relations0);
        let mut relations1 = Relation::parse_set(&sample.relations1);

        let defaulted = relations0.is_empty() && relations1.is_empty();
        if defaulted {
            relations0.insert(Relation::Circumstantial);
            relations1.insert(Relation::Circumstantial);
        }

        Self {
            source_index: index,
            timestamp: sample.timestamp,
            relations0,
            relations1,
            slider0: sample.slider0,
            slider1: sample.slider1,
            defaulted,
            reason,
        }
    }

    /// Same configuration with participants exchanged
    pub fn swapped(&self) -> Self {
        Self {
            relations0: self.relations1.clone(),
            relations1: self.relations0.clone(),
            slider0: self.slider1,
            slider1: self.slider0,
            ..self.clone()
        }
    }
}

/// Contiguous tail of the session analysed for SCL trends
#[derive(Debug, Clone, Copy)]
pub struct DynamicWindow<'a> {
    samples: &'a [Sample],
    /// Index of the first window sample in the session
    start_index: usize,
}

impl<'a> DynamicWindow<'a> {
    pub fn new(samples: &'a [Sample], start_index: usize) -> Self {
        Self {
            samples,
            start_index,
        }
    }

    pub fn samples(&self) -> &'a [Sample] {
        self.samples
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Timestamp of the first sample (0 for an empty window)
    pub fn start_time(&self) -> f64 {
        self.samples.first().map(|s| s.timestamp).unwrap_or(0.0)
    }
}

/// Output of the phase segmenter
#[derive(Debug, Clone)]
pub struct Segmentation<'a> {
    pub snapshot: StaticSnapshot,
    pub window: DynamicWindow<'a>,
    /// Index of the first Phase 2 sample, if a gap was found
    pub boundary: Option<usize>,
    pub reason: ReasonCode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_defaults_when_both_empty() {
        let sample = Sample::scl(0.0, 100.0, 100.0);
        let snap = StaticSnapshot::from_sample(3, &sample, ReasonCode::R112_SNAPSHOT_LAST_SAMPLE);

        assert!(snap.defaulted);
        assert!(snap.relations0.contains(&Relation::Circumstantial));
        assert!(snap.relations1.contains(&Relation::Circumstantial));
        assert_eq!(snap.source_index, 3);
    }

    #[test]
    fn test_snapshot_keeps_one_sided_selection() {
        let sample = Sample::scl(0.0, 100.0, 100.0).with_relations(&["ROMANTIC"], &[]);
        let snap = StaticSnapshot::from_sample(0, &sample, ReasonCode::R110_SNAPSHOT_PHASE1);

        assert!(!snap.defaulted);
        assert_eq!(snap.relations0.len(), 1);
        assert!(snap.relations1.is_empty());
    }

    #[test]
    fn test_window_start_time() {
        let samples = vec![Sample::scl(5.0, 1.0, 1.0), Sample::scl(6.0, 1.0, 1.0)];
        let window = DynamicWindow::new(&samples[1..], 1);
        assert_eq!(window.start_time(), 6.0);
        assert_eq!(window.len(), 1);
        assert_eq!(window.start_index(), 1);
    }
}
