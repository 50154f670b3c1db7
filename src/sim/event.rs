use serde::{Deserialize, Serialize};

use crate::dynamics::state::SimConfig;
use crate::geo::Geodetic;

// ---------------------------------------------------------------------------
// Descent phases
// ---------------------------------------------------------------------------

/// Where a descent stands after a given number of steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Falling,
    Landed,
    TimedOut,
}

/// How a finished descent ended.
///
/// A `TimedOut` fix is only the last position before the cap, not a landing
/// site; callers that need a real impact point should treat it as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Landed,
    TimedOut,
}

impl Phase {
    pub fn termination(self) -> Option<Termination> {
        match self {
            Phase::Falling => None,
            Phase::Landed => Some(Termination::Landed),
            Phase::TimedOut => Some(Termination::TimedOut),
        }
    }

    pub fn is_terminal(self) -> bool {
        self != Phase::Falling
    }
}

/// Classify the current fix after `steps` integration steps.
///
/// Ground contact wins over the time cap when both hold on the same step.
pub fn classify(fix: &Geodetic, steps: usize, config: &SimConfig) -> Phase {
    if fix.alt <= 0.0 {
        Phase::Landed
    } else if steps >= config.max_steps() {
        Phase::TimedOut
    } else {
        Phase::Falling
    }
}
