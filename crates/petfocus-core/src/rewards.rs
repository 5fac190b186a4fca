//! Reward amounts granted for finished work.

use serde::{Deserialize, Serialize};

use crate::task::Priority;

/// XP granted per focused minute.
pub const XP_PER_FOCUS_MINUTE: u32 = 2;

/// Experience and treats granted for completing something.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub xp: u32,
    pub treats: u32,
}

impl Reward {
    pub const NONE: Reward = Reward { xp: 0, treats: 0 };
}

/// Reward for completing a task of the given priority.
pub fn calculate_rewards(priority: Priority) -> Reward {
    match priority {
        Priority::High => Reward { xp: 50, treats: 2 },
        Priority::Medium => Reward { xp: 30, treats: 1 },
        Priority::Low => Reward { xp: 20, treats: 1 },
    }
}

/// XP for a focus session lasting `duration_secs`. Partial minutes round up.
pub fn focus_xp(duration_secs: u64) -> u32 {
    u32::try_from(focus_minutes(duration_secs))
        .unwrap_or(u32::MAX)
        .saturating_mul(XP_PER_FOCUS_MINUTE)
}

/// Whole minutes credited for `duration_secs` of focus.
pub fn focus_minutes(duration_secs: u64) -> u64 {
    duration_secs.div_ceil(60)
}
