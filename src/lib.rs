//! ALUA: synchrony engine for two-person biometric sessions
//!
//! Pipeline: Session → PhaseSegmenter → SensorHealth → (ArousalDetector | FallbackGenerator)
//! → CompatibilityScorer → WeakLinkAttributor → ScoreResult → ContractRecord

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod types;

pub use config::AnalysisConfig;
pub use error::{AnalysisError, ConfigError, StorageError};

// =============================================================================
// PHASES [C]
// =============================================================================

/// Timestamp gap (seconds) that separates Phase 1 (configuration) from Phase 2
pub const PHASE_GAP_SECS: f64 = 2.0;

// =============================================================================
// SENSOR HEALTH [C]
// =============================================================================

/// Raw SCL below this value is a dead reading
pub const DEAD_SENSOR_FLOOR: f64 = 10.0;

/// Fraction of dead readings at which a channel is declared dead
pub const DEAD_SENSOR_FRACTION: f64 = 0.20;

// =============================================================================
// AROUSAL WINDOW [C]
// =============================================================================

/// Analysed span of the dynamic window (seconds, relative to its first sample)
pub const ANALYSIS_DURATION_SECS: f64 = 40.0;

/// Leading span of the dynamic window that is skipped
pub const SCL_START_DELAY_SECS: f64 = 0.0;

pub const SCL_MIN_VALID: f64 = 0.0;
pub const SCL_MAX_VALID: f64 = 500.0;

/// Largest accepted jump from the last accepted reading
pub const SCL_MAX_STEP: f64 = 80.0;

/// Relative increase (second half vs first half) that counts as arousal
pub const THRESHOLD_REL_SCL: f64 = 0.05;

// =============================================================================
// SLIDER + BUTTONS [C]
// =============================================================================

/// Full-scale raw slider value; also read as a broken sensor
pub const SLIDER_MAX_RAW: u16 = 1023;

/// Flat tolerance (percentage points) before slider distance is penalised
pub const SLIDER_TOLERANCE_PCT: f64 = 2.0;

/// Button score when neither participant selected a relation
pub const EMPTY_BUTTONS_SCORE: f64 = 0.0;

// =============================================================================
// COMPATIBILITY WEIGHTS [C] - sum = 1.0
// =============================================================================

pub const WEIGHT_SCL: f64 = 0.50;
pub const WEIGHT_SLIDER: f64 = 0.25;
pub const WEIGHT_BUTTONS: f64 = 0.25;

// =============================================================================
// FALLBACK [C]
// =============================================================================

/// Sample rate of synthetic fallback series (Hz)
pub const FALLBACK_SAMPLE_RATE_HZ: f64 = 10.0;

// =============================================================================
// RECORD
// =============================================================================

/// Base of the link encoded in the printed QR code
pub const RECORD_BASE_URL: &str = "https://alua-gamma.vercel.app/";

/// Length of the contract identifier shared by QR and printout
pub const CONTRACT_ID_LEN: usize = 9;

/// Served results the HTTP API keeps in memory for `GET /record/:id`
pub const MAX_STORED_RECORDS: usize = 1024;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
