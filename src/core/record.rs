//! Contract record: id + QR link derived from a ScoreResult
//!
//! The link carries the printed numbers only (averages, sub-scores,
//! compatibility, tier, cost, buttons, weak link), never the per-sample series.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{Relation, RiskTier, ScoreResult};
use crate::CONTRACT_ID_LEN;

const ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Identifier and link shared by the printed contract and its QR code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub id: String,
    pub link: String,
    pub compatibility: u8,
    pub risk_tier: RiskTier,
    pub cost: String,
    pub session_digest: String,
}

impl ContractRecord {
    /// Build a record with a fresh contract id
    pub fn build<R: Rng + ?Sized>(result: &ScoreResult, base_url: &str, rng: &mut R) -> Self {
        let id = generate_contract_id(rng);
        let link = record_link(result, base_url, &id);
        Self {
            id,
            link,
            compatibility: result.compatibility,
            risk_tier: result.risk_tier,
            cost: result.risk_tier.price().to_string(),
            session_digest: result.session_digest.clone(),
        }
    }
}

/// 9 uppercase alphanumeric characters
pub fn generate_contract_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CONTRACT_ID_LEN)
        .map(|_| char::from(ID_CHARSET[rng.random_range(0..ID_CHARSET.len())]))
        .collect()
}

/// Query-string link for the QR code
pub fn record_link(result: &ScoreResult, base_url: &str, id: &str) -> String {
    let params: Vec<(&str, String)> = vec![
        ("scl0", (result.averages.scl0 as i64).to_string()),
        ("scl1", (result.averages.scl1 as i64).to_string()),
        ("sl0", result.snapshot.slider0.to_string()),
        ("sl1", result.snapshot.slider1.to_string()),
        ("scl", format!("{:.2}", result.sub_scores.scl)),
        ("sli", format!("{:.2}", result.sub_scores.slider)),
        ("comp", result.compatibility.to_string()),
        ("btn0", button_indices(&result.snapshot.relations0)),
        ("btn1", button_indices(&result.snapshot.relations1)),
        ("bad", result.weak_link.id.to_string()),
        ("fascia", result.risk_tier.number().to_string()),
        ("cost", result.risk_tier.price_eur().to_string()),
        ("id", id.to_string()),
    ];

    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{base_url}?{query}")
}

/// Comma-joined button indices in button order
fn button_indices<'a>(relations: impl IntoIterator<Item = &'a Relation>) -> String {
    let mut idx: Vec<usize> = relations.into_iter().map(Relation::index).collect();
    idx.sort_unstable();
    idx.iter().map(usize::to_string).collect::<Vec<_>>().join(",")
}

/// Form encoding: unreserved bytes kept, space as '+', everything else %XX
fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(char::from(byte))
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================
