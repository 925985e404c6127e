//! Risk Classifier + Weak-Link Attributor
//!
//! - tier: <25 → 4, <50 → 3, <75 → 2, else 1
//! - weak link: none at an extreme SCL score, else the lone aroused participant

use crate::types::{ArousalPair, ReasonCode, RiskTier, WeakLink};

/// Risk tier for a compatibility percentage
pub fn classify(compatibility: u8) -> RiskTier {
    RiskTier::from_compatibility(compatibility)
}

/// Weak-link attributor
#[derive(Debug, Default, Clone, Copy)]
pub struct WeakLinkAttributor;

impl WeakLinkAttributor {
    pub fn new() -> Self {
        Self
    }

    /// Name the participant whose isolated arousal unbalanced the SCL pattern
    ///
    /// An SCL score of 0 or 1 never names anyone, whatever the arousal
    /// pattern or the slider and button asymmetry.
    pub fn attribute(&self, arousal: &ArousalPair, scl_score: f64) -> WeakLink {
        let weak_link = if scl_score <= 0.0 || scl_score >= 1.0 {
            WeakLink::none(ReasonCode::R402_NO_WEAK_LINK_EXTREME)
        } else {
            match arousal.lone_aroused() {
                Some(participant) => WeakLink::named(participant),
                None => WeakLink::none(ReasonCode::R403_NO_WEAK_LINK_BALANCED),
            }
        };

        tracing::debug!(
            target: "attribution",
            id = weak_link.id,
            reason = weak_link.reason.code(),
            scl_score,
            "weak link attributed"
        );
        weak_link
    }
}

// =============================================================================
// TESTS
// =============================================================================
