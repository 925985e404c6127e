//! Risk tier definitions

use serde::{Deserialize, Serialize};

/// Four risk tiers, 1 (best) to 4 (worst)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum RiskTier {
    /// compatibility >= 75
    Minimal,
    /// 50..75
    Moderate,
    /// 25..50
    Significant,
    /// < 25
    Catastrophic,
}

impl RiskTier {
    /// Classify a compatibility percentage
    pub fn from_compatibility(percent: u8) -> Self {
        if percent < 25 {
            RiskTier::Catastrophic
        } else if percent < 50 {
            RiskTier::Significant
        } else if percent < 75 {
            RiskTier::Moderate
        } else {
            RiskTier::Minimal
        }
    }

    /// Tier number (1..=4)
    pub fn number(&self) -> u8 {
        match self {
            RiskTier::Minimal => 1,
            RiskTier::Moderate => 2,
            RiskTier::Significant => 3,
            RiskTier::Catastrophic => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Minimal => "MINIMAL",
            RiskTier::Moderate => "MODERATE",
            RiskTier::Significant => "SIGNIFICANT",
            RiskTier::Catastrophic => "CATASTROPHIC",
        }
    }

    /// Printed cost tier
    pub fn price(&self) -> &'static str {
        match self {
            RiskTier::Minimal => "250,00€",
            RiskTier::Moderate => "500,00€",
            RiskTier::Significant => "750,00€",
            RiskTier::Catastrophic => "1.000,00€",
        }
    }

    /// Cost tier in whole euros
    pub fn price_eur(&self) -> u32 {
        u32::from(self.number()) * 250
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            RiskTier::Minimal => "🟢",
            RiskTier::Moderate => "🟡",
            RiskTier::Significant => "🟠",
            RiskTier::Catastrophic => "🔴",
        }
    }
}

impl From<RiskTier> for u8 {
    fn from(tier: RiskTier) -> u8 {
        tier.number()
    }
}

impl TryFrom<u8> for RiskTier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(RiskTier::Minimal),
            2 => Ok(RiskTier::Moderate),
            3 => Ok(RiskTier::Significant),
            4 => Ok(RiskTier::Catastrophic),
            other => Err(format!("risk tier must be 1..=4, got {other}")),
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.number(), self.label())
    }
}
