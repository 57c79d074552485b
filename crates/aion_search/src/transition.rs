//! Rise/fall transitions and min/max analysis modes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A signal transition direction.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiseFall {
    /// Rising transition.
    Rise,
    /// Falling transition.
    Fall,
}

impl RiseFall {
    /// Returns the transition's index (rise = 0, fall = 1).
    pub fn index(self) -> u8 {
        match self {
            RiseFall::Rise => 0,
            RiseFall::Fall => 1,
        }
    }

    /// Looks up a transition by index.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(RiseFall::Rise),
            1 => Some(RiseFall::Fall),
            _ => None,
        }
    }
}

impl fmt::Display for RiseFall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiseFall::Rise => write!(f, "rise"),
            RiseFall::Fall => write!(f, "fall"),
        }
    }
}

/// Whether an analysis point tracks earliest (hold) or latest (setup) arrivals.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinMax {
    /// Earliest arrival.
    Min,
    /// Latest arrival.
    Max,
}

impl fmt::Display for MinMax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinMax::Min => write!(f, "min"),
            MinMax::Max => write!(f, "max"),
        }
    }
}
