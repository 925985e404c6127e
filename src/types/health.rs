//! Sensor health per conductance channel

use serde::{Deserialize, Serialize};

use crate::types::{Participant, ReasonCode};

/// Alive/dead status of both SCL channels over a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorHealth {
    pub alive0: bool,
    pub alive1: bool,
    /// Fraction of readings below the dead floor
    pub dead_fraction0: f64,
    pub dead_fraction1: f64,
    pub reason: ReasonCode,
}

impl SensorHealth {
    pub fn new(dead_fraction0: f64, dead_fraction1: f64, alive0: bool, alive1: bool) -> Self {
        let reason = match (alive0, alive1) {
            (true, true) => ReasonCode::R201_SENSORS_ALIVE,
            (false, true) => ReasonCode::R202_SENSOR_DEAD_P0,
            (true, false) => ReasonCode::R203_SENSOR_DEAD_P1,
            (false, false) => ReasonCode::R204_SENSORS_DEAD_BOTH,
        };
        Self {
            alive0,
            alive1,
            dead_fraction0,
            dead_fraction1,
            reason,
        }
    }

    /// Real-data path requires both channels alive
    pub fn all_alive(&self) -> bool {
        self.alive0 && self.alive1
    }

    pub fn is_alive(&self, participant: Participant) -> bool {
        match participant {
            Participant::P0 => self.alive0,
            Participant::P1 => self.alive1,
        }
    }

    pub fn dead_participants(&self) -> Vec<Participant> {
        Participant::ALL
            .into_iter()
            .filter(|p| !self.is_alive(*p))
            .collect()
    }
}
