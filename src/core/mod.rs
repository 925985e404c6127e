//! Core engines for ALUA

pub mod segmenter;
pub mod health;
pub mod arousal;
pub mod fallback;
pub mod scorer;
pub mod attribution;
pub mod analyzer;
pub mod record;
pub mod storage;
pub mod api;

pub use segmenter::PhaseSegmenter;
pub use health::SensorHealthMonitor;
pub use arousal::{ArousalDetector, HalfStats};
pub use fallback::{FallbackGenerator, FallbackOutput, WalkParams};
pub use scorer::CompatibilityScorer;
pub use attribution::{classify, WeakLinkAttributor};
pub use analyzer::{session_digest, Analyzer};
pub use record::{generate_contract_id, record_link, ContractRecord};
pub use storage::{load_result, load_samples, parse_samples, save_result, StoredResult};
pub use api::{create_router, create_router_with_capacity, run_server, RecordStore};
