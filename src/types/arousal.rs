//! Arousal results: per-participant SCL trend between the two half-windows

use serde::{Deserialize, Serialize};

use crate::types::{Participant, ReasonCode};

/// SCL trend for one participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArousalResult {
    /// Mean accepted SCL in the first half (0 if none)
    pub mean_first: f64,
    /// Mean accepted SCL in the second half (0 if none)
    pub mean_second: f64,
    /// mean_second - mean_first
    pub delta: f64,
    /// delta / mean_first
    pub rel_diff: f64,
    pub arousal: bool,
    /// Set when a half-window was empty; carries the forced outcome
    pub fake: Option<bool>,
    pub count_first: usize,
    pub count_second: usize,
    pub reason: ReasonCode,
}

impl ArousalResult {
    /// Result from two populated halves
    pub fn computed(
        mean_first: f64,
        mean_second: f64,
        count_first: usize,
        count_second: usize,
        threshold: f64,
    ) -> Self {
        let delta = mean_second - mean_first;
        let rel_diff = delta / mean_first;
        Self {
            mean_first,
            mean_second,
            delta,
            rel_diff,
            arousal: rel_diff >= threshold,
            fake: None,
            count_first,
            count_second,
            reason: ReasonCode::R301_AROUSAL_COMPUTED,
        }
    }

    /// Deterministic result when a half-window had nothing to average
    pub fn missing_half(
        mean_first: f64,
        mean_second: f64,
        count_first: usize,
        count_second: usize,
    ) -> Self {
        Self {
            mean_first,
            mean_second,
            delta: 0.0,
            rel_diff: 0.0,
            arousal: false,
            fake: Some(false),
            count_first,
            count_second,
            reason: ReasonCode::R302_AROUSAL_MISSING_HALF,
        }
    }

    /// Fallback result: flag from the scenario, magnitudes from the synthetic means
    pub fn scenario(
        arousal: bool,
        mean_first: f64,
        mean_second: f64,
        count_first: usize,
        count_second: usize,
    ) -> Self {
        let delta = mean_second - mean_first;
        let rel_diff = if mean_first > 0.0 { delta / mean_first } else { 0.0 };
        Self {
            mean_first,
            mean_second,
            delta,
            rel_diff,
            arousal,
            fake: None,
            count_first,
            count_second,
            reason: ReasonCode::R303_AROUSAL_FALLBACK,
        }
    }

    pub fn is_missing_half(&self) -> bool {
        self.fake.is_some()
    }
}

/// Arousal results for both participants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArousalPair {
    pub persona0: ArousalResult,
    pub persona1: ArousalResult,
}

impl ArousalPair {
    pub fn new(persona0: ArousalResult, persona1: ArousalResult) -> Self {
        Self { persona0, persona1 }
    }

    pub fn get(&self, participant: Participant) -> &ArousalResult {
        match participant {
            Participant::P0 => &self.persona0,
            Participant::P1 => &self.persona1,
        }
    }

    /// Both arousal flags, participant 0 first
    pub fn flags(&self) -> (bool, bool) {
        (self.persona0.arousal, self.persona1.arousal)
    }

    /// The only aroused participant, if exactly one is
    pub fn lone_aroused(&self) -> Option<Participant> {
        match self.flags() {
            (true, false) => Some(Participant::P0),
            (false, true) => Some(Participant::P1),
            _ => None,
        }
    }

    pub fn swapped(&self) -> Self {
        Self {
            persona0: self.persona1.clone(),
            persona1: self.persona0.clone(),
        }
    }
}
