//! Core types for ALUA

mod arousal;
mod health;
mod output;
mod phase;
mod reason;
mod risk;
mod sample;
mod scenario;
mod score;

pub use arousal::{ArousalPair, ArousalResult};
pub use health::SensorHealth;
pub use phase::{DynamicWindow, Segmentation, StaticSnapshot};
pub use reason::ReasonCode;
pub use risk::RiskTier;
pub use sample::{Participant, Relation, Sample};
pub use scenario::{FallbackScenario, TracePoint};
pub use score::{SclAverages, ScoreResult, SubScores, WeakLink};
