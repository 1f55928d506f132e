pub mod escalation;
pub mod follow_up;
pub mod schedule;

pub use escalation::{
    completes_streak, pick_transfer_target, ESCALATION_STREAK, STREAK_WINDOW,
};
pub use follow_up::wants_follow_up;
pub use schedule::{next_day_follow_up, resolve_next_action, FOLLOW_UP_HOUR};
