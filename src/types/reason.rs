//! Reason codes for every decision the pipeline takes

use serde::{Deserialize, Serialize};

/// Reason codes, grouped by pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    // =========================================================================
    // R1xx: Phase segmentation
    // =========================================================================
    /// Timestamp gap found, Phase 2 starts at the boundary sample
    R101_PHASE_SPLIT_AT_GAP,
    /// No gap, whole session is the dynamic window
    R102_PHASE_NO_GAP,
    /// Snapshot is the last Phase 1 sample with a selection
    R110_SNAPSHOT_PHASE1,
    /// Snapshot is the last session sample with a selection
    R111_SNAPSHOT_SESSION,
    /// No sample had a selection, snapshot is the last sample
    R112_SNAPSHOT_LAST_SAMPLE,

    // =========================================================================
    // R2xx: Sensor health
    // =========================================================================
    /// Both conductance channels alive
    R201_SENSORS_ALIVE,
    /// Participant 0 channel dead
    R202_SENSOR_DEAD_P0,
    /// Participant 1 channel dead
    R203_SENSOR_DEAD_P1,
    /// Both channels dead
    R204_SENSORS_DEAD_BOTH,

    // =========================================================================
    // R3xx: Arousal
    // =========================================================================
    /// Arousal computed from two populated half-windows
    R301_AROUSAL_COMPUTED,
    /// A half-window had no accepted samples, arousal forced off
    R302_AROUSAL_MISSING_HALF,
    /// Arousal taken from a fallback scenario
    R303_AROUSAL_FALLBACK,

    // =========================================================================
    // R4xx: Weak link
    // =========================================================================
    /// Exactly one participant aroused
    R401_WEAK_LINK_UNBALANCED,
    /// Both aroused or both calm, SCL score at an extreme
    R402_NO_WEAK_LINK_EXTREME,
    /// Same arousal state, SCL score not at an extreme
    R403_NO_WEAK_LINK_BALANCED,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::R101_PHASE_SPLIT_AT_GAP => "R101_PHASE_SPLIT_AT_GAP",
            Self::R102_PHASE_NO_GAP => "R102_PHASE_NO_GAP",
            Self::R110_SNAPSHOT_PHASE1 => "R110_SNAPSHOT_PHASE1",
            Self::R111_SNAPSHOT_SESSION => "R111_SNAPSHOT_SESSION",
            Self::R112_SNAPSHOT_LAST_SAMPLE => "R112_SNAPSHOT_LAST_SAMPLE",
            Self::R201_SENSORS_ALIVE => "R201_SENSORS_ALIVE",
            Self::R202_SENSOR_DEAD_P0 => "R202_SENSOR_DEAD_P0",
            Self::R203_SENSOR_DEAD_P1 => "R203_SENSOR_DEAD_P1",
            Self::R204_SENSORS_DEAD_BOTH => "R204_SENSORS_DEAD_BOTH",
            Self::R301_AROUSAL_COMPUTED => "R301_AROUSAL_COMPUTED",
            Self::R302_AROUSAL_MISSING_HALF => "R302_AROUSAL_MISSING_HALF",
            Self::R303_AROUSAL_FALLBACK => "R303_AROUSAL_FALLBACK",
            Self::R401_WEAK_LINK_UNBALANCED => "R401_WEAK_LINK_UNBALANCED",
            Self::R402_NO_WEAK_LINK_EXTREME => "R402_NO_WEAK_LINK_EXTREME",
            Self::R403_NO_WEAK_LINK_BALANCED => "R403_NO_WEAK_LINK_BALANCED",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::R101_PHASE_SPLIT_AT_GAP => "Phase boundary found",
            Self::R102_PHASE_NO_GAP => "No phase gap, whole session analysed",
            Self::R110_SNAPSHOT_PHASE1 => "Configuration taken from Phase 1",
            Self::R111_SNAPSHOT_SESSION => "Configuration taken from session search",
            Self::R112_SNAPSHOT_LAST_SAMPLE => "No selections, last sample used",
            Self::R201_SENSORS_ALIVE => "Both sensors alive",
            Self::R202_SENSOR_DEAD_P0 => "Participant 0 sensor dead",
            Self::R203_SENSOR_DEAD_P1 => "Participant 1 sensor dead",
            Self::R204_SENSORS_DEAD_BOTH => "Both sensors dead",
            Self::R301_AROUSAL_COMPUTED => "Arousal computed",
            Self::R302_AROUSAL_MISSING_HALF => "Half-window without valid samples",
            Self::R303_AROUSAL_FALLBACK => "Arousal from fallback scenario",
            Self::R401_WEAK_LINK_UNBALANCED => "Unbalanced SCL arousal",
            Self::R402_NO_WEAK_LINK_EXTREME => "Extreme SCL pattern (0% or 100%)",
            Self::R403_NO_WEAK_LINK_BALANCED => "Balanced SCL arousal",
        }
    }

    /// Does this code mark a recovered condition rather than a clean path?
    pub fn is_recovery(&self) -> bool {
        matches!(
            self,
            Self::R102_PHASE_NO_GAP
                | Self::R112_SNAPSHOT_LAST_SAMPLE
                | Self::R202_SENSOR_DEAD_P0
                | Self::R203_SENSOR_DEAD_P1
                | Self::R204_SENSORS_DEAD_BOTH
                | Self::R302_AROUSAL_MISSING_HALF
                | Self::R303_AROUSAL_FALLBACK
        )
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
