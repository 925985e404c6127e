//! HTTP API for ALUA
//!
//! Endpoints:
//! - POST /analyze - Score a session, returns result + contract record
//! - GET /record/{id} - Fetch an earlier analysis by contract id
//! - GET /health - Health check

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::AnalysisConfig;
use crate::core::{save_result, Analyzer, ContractRecord, StoredResult};
use crate::types::{Sample, ScoreResult};

/// Served results by contract id, oldest evicted past `capacity`
#[derive(Debug)]
pub struct RecordStore {
    by_id: HashMap<String, StoredResult>,
    order: VecDeque<String>,
    capacity: usize,
}

impl RecordStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            by_id: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Store a result, returning the id evicted to make room
    pub fn insert(&mut self, stored: StoredResult) -> Option<String> {
        let id = stored.record.id.clone();
        if self.by_id.insert(id.clone(), stored).is_some() {
            return None;
        }
        self.order.push_back(id);

        if self.order.len() <= self.capacity {
            return None;
        }
        let evicted = self.order.pop_front()?;
        self.by_id.remove(&evicted);
        Some(evicted)
    }

    pub fn get(&self, id: &str) -> Option<&StoredResult> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// App state
pub struct AppState {
    pub analyzer: Analyzer,
    pub records: RwLock<RecordStore>,
    /// Where results are written; None keeps them in memory only
    pub results_dir: Option<PathBuf>,
}

/// Analyze request
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub samples: Vec<Sample>,
    /// Pins the fallback scenario and contract id
    pub seed: Option<u64>,
}

/// Analyze response
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub result: ScoreResult,
    pub record: ContractRecord,
}

/// Error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub records_stored: usize,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// Create the API router
pub fn create_router(config: AnalysisConfig, results_dir: Option<PathBuf>) -> Router {
    create_router_with_capacity(config, results_dir, crate::MAX_STORED_RECORDS)
}

/// Create the API router, keeping at most `capacity` results in memory
pub fn create_router_with_capacity(
    config: AnalysisConfig,
    results_dir: Option<PathBuf>,
    capacity: usize,
) -> Router {
    let state = Arc::new(AppState {
        analyzer: Analyzer::new(config),
        records: RwLock::new(RecordStore::new(capacity)),
        results_dir,
    });

    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route("/record/:id", get(get_record))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let records = state.records.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        records_stored: records.len(),
    })
}

/// Score one session
async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let (result, record) = run_analysis(&state, &req)?;

    if let Some(dir) = state.results_dir.clone() {
        let (result, record) = (result.clone(), record.clone());
        tokio::task::spawn_blocking(move || save_result(&result, &record, dir))
            .await
            .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))?
            .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))?;
    }

    let evicted = state.records.write().await.insert(StoredResult {
        result: result.clone(),
        record: record.clone(),
    });
    if let Some(evicted) = evicted {
        tracing::debug!(target: "api", %evicted, "oldest record evicted");
    }

    tracing::info!(
        target: "api",
        id = %record.id,
        compatibility = result.compatibility,
        "analysis served"
    );
    Ok(Json(AnalyzeResponse { result, record }))
}

/// Analysis + record, kept synchronous so the RNG never crosses an await
fn run_analysis(
    state: &AppState,
    req: &AnalyzeRequest,
) -> Result<(ScoreResult, ContractRecord), ApiError> {
    let mut rng: Box<dyn RngCore> = match req.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::rng()),
    };
    let result = state
        .analyzer
        .analyze_with_rng(&req.samples, &mut *rng)
        .map_err(|e| api_error(StatusCode::UNPROCESSABLE_ENTITY, e))?;
    let record = ContractRecord::build(
        &result,
        &state.analyzer.config().record_base_url,
        &mut *rng,
    );
    Ok((result, record))
}

/// Fetch an earlier analysis
async fn get_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StoredResult>, ApiError> {
    let records = state.records.read().await;
    let stored = records
        .get(&id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("no record {id}")))?;
    Ok(Json(stored.clone()))
}

/// Run the API server
pub async fn run_server(
    addr: &str,
    config: AnalysisConfig,
    results_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(config, results_dir);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(target: "api", %addr, "ALUA API listening");
    println!("ALUA API running on {}", addr);
    println!("  POST /analyze     - Score a session");
    println!("  GET  /record/:id  - Fetch an analysis");
    println!("  GET  /health      - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(seed: u64) -> StoredResult {
        let samples = vec![Sample::scl(0.0, 5.0, 200.0), Sample::scl(0.1, 5.0, 210.0)];
        let mut rng = StdRng::seed_from_u64(seed);
        let result = Analyzer::default().analyze_with_rng(&samples, &mut rng).unwrap();
        let record = ContractRecord::build(&result, "https://example.test/", &mut rng);
        StoredResult { result, record }
    }

    #[test]
    fn test_record_store_evicts_oldest() {
        let mut store = RecordStore::new(2);
        let (a, b, c) = (stored(1), stored(2), stored(3));
        let (id_a, id_b, id_c) = (a.record.id.clone(), b.record.id.clone(), c.record.id.clone());

        assert_eq!(store.insert(a), None);
        assert_eq!(store.insert(b), None);
        assert_eq!(store.insert(c), Some(id_a.clone()));

        assert_eq!(store.len(), 2);
        assert!(store.get(&id_a).is_none());
        assert!(store.get(&id_b).is_some());
        assert!(store.get(&id_c).is_some());
    }

    #[test]
    fn test_record_store_replaces_same_id() {
        let mut store = RecordStore::new(1);
        assert!(store.is_empty());
        assert_eq!(store.insert(stored(4)), None);
        assert_eq!(store.insert(stored(4)), None);
        assert_eq!(store.len(), 1);
    }
}
