//! Sample model: one synchronized reading for both participants

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The two people in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Participant {
    P0,
    P1,
}

impl Participant {
    pub const ALL: [Participant; 2] = [Participant::P0, Participant::P1];

    /// Numeric id used in records (0 or 1)
    pub fn id(&self) -> i8 {
        match self {
            Participant::P0 => 0,
            Participant::P1 => 1,
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PARTICIPANT {}", self.id())
    }
}

/// Relation categories, in hardware button order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relation {
    Circumstantial,
    Romantic,
    Professional,
    Friendship,
    Family,
    Cohabitation,
}

impl Relation {
    pub const ALL: [Relation; 6] = [
        Relation::Circumstantial,
        Relation::Romantic,
        Relation::Professional,
        Relation::Friendship,
        Relation::Family,
        Relation::Cohabitation,
    ];

    /// Button index (0..6)
    pub fn index(&self) -> usize {
        match self {
            Relation::Circumstantial => 0,
            Relation::Romantic => 1,
            Relation::Professional => 2,
            Relation::Friendship => 3,
            Relation::Family => 4,
            Relation::Cohabitation => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Relation::Circumstantial => "CIRCUMSTANTIAL",
            Relation::Romantic => "ROMANTIC",
            Relation::Professional => "PROFESSIONAL",
            Relation::Friendship => "FRIENDSHIP",
            Relation::Family => "FAMILY",
            Relation::Cohabitation => "COHABITATION",
        }
    }

    /// Parse a label; accepts the installation's Italian button labels too
    pub fn from_label(label: &str) -> Option<Relation> {
        match label.trim().to_ascii_uppercase().as_str() {
            "CIRCUMSTANTIAL" | "CONOSCENZA" => Some(Relation::Circumstantial),
            "ROMANTIC" | "ROMANTICA" => Some(Relation::Romantic),
            "PROFESSIONAL" | "LAVORATIVA" => Some(Relation::Professional),
            "FRIENDSHIP" | "AMICALE" => Some(Relation::Friendship),
            "FAMILY" | "FAMILIARE" => Some(Relation::Family),
            "COHABITATION" | "CONVIVENZA" => Some(Relation::Cohabitation),
            _ => None,
        }
    }

    /// Parse a label list, dropping unknown labels and duplicates
    pub fn parse_set<S: AsRef<str>>(labels: &[S]) -> BTreeSet<Relation> {
        labels
            .iter()
            .filter_map(|l| Relation::from_label(l.as_ref()))
            .collect()
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One synchronized reading, as stored in the session JSONL file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    /// Seconds (monotonic within a session)
    #[serde(rename = "TIMESTAMP", default)]
    pub timestamp: f64,
    #[serde(rename = "SCL0", default)]
    pub scl0: f64,
    #[serde(rename = "SCL1", default)]
    pub scl1: f64,
    /// Raw slider, nominally 0..=1023
    #[serde(rename = "SLIDER0", default)]
    pub slider0: i32,
    #[serde(rename = "SLIDER1", default)]
    pub slider1: i32,
    #[serde(rename = "RELAZIONI_P0", default)]
    pub relations0: Vec<String>,
    #[serde(rename = "RELAZIONI_P1", default)]
    pub relations1: Vec<String>,
}

impl Sample {
    /// Sample with SCL readings only (no sliders, no selections)
    pub fn scl(timestamp: f64, scl0: f64, scl1: f64) -> Self {
        Self {
            timestamp,
            scl0,
            scl1,
            ..Self::default()
        }
    }

    pub fn with_sliders(mut self, slider0: i32, slider1: i32) -> Self {
        self.slider0 = slider0;
        self.slider1 = slider1;
        self
    }

    pub fn with_relations(mut self, relations0: &[&str], relations1: &[&str]) -> Self {
        self.relations0 = relations0.iter().map(|s| s.to_string()).collect();
        self.relations1 = relations1.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Raw SCL for one participant
    pub fn scl_of(&self, participant: Participant) -> f64 {
        match participant {
            Participant::P0 => self.scl0,
            Participant::P1 => self.scl1,
        }
    }

    /// Either participant pressed at least one button
    pub fn has_selection(&self) -> bool {
        !self.relations0.is_empty() || !self.relations1.is_empty()
    }

    /// Same reading with the participants exchanged
    pub fn swapped(&self) -> Self {
        Self {
            timestamp: self.timestamp,
            scl0: self.scl1,
            scl1: self.scl0,
            slider0: self.slider1,
            slider1: self.slider0,
            relations0: self.relations1.clone(),
            relations1: self.relations0.clone(),
        }
    }
}
