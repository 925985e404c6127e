//! Fallback scenarios and the SCL trace handed to renderers

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Participant;

/// One of four canonical arousal patterns substituted for dead sensor data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FallbackScenario {
    #[serde(rename = "NO-NO")]
    NoNo,
    #[serde(rename = "YES-YES")]
    YesYes,
    #[serde(rename = "NO-YES")]
    NoYes,
    #[serde(rename = "YES-NO")]
    YesNo,
}

impl FallbackScenario {
    pub const ALL: [FallbackScenario; 4] = [
        FallbackScenario::NoNo,
        FallbackScenario::YesYes,
        FallbackScenario::NoYes,
        FallbackScenario::YesNo,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            FallbackScenario::NoNo => "NO-NO",
            FallbackScenario::YesYes => "YES-YES",
            FallbackScenario::NoYes => "NO-YES",
            FallbackScenario::YesNo => "YES-NO",
        }
    }

    pub fn from_token(token: &str) -> Option<FallbackScenario> {
        Self::ALL
            .into_iter()
            .find(|s| s.token().eq_ignore_ascii_case(token.trim()))
    }

    /// Arousal flag this scenario assigns to a participant
    pub fn arousal(&self, participant: Participant) -> bool {
        let (a0, a1) = match self {
            FallbackScenario::NoNo => (false, false),
            FallbackScenario::YesYes => (true, true),
            FallbackScenario::NoYes => (false, true),
            FallbackScenario::YesNo => (true, false),
        };
        match participant {
            Participant::P0 => a0,
            Participant::P1 => a1,
        }
    }
}

impl fmt::Display for FallbackScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// One point of the SCL series drawn by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TracePoint {
    /// Seconds from the start of the dynamic window
    pub t: f64,
    pub scl0: f64,
    pub scl1: f64,
}

impl TracePoint {
    pub fn scl_of(&self, participant: Participant) -> f64 {
        match participant {
            Participant::P0 => self.scl0,
            Participant::P1 => self.scl1,
        }
    }
}
