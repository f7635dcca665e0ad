//! Notification fan-out and the overdue requisition sweep.

pub mod dispatch;
pub mod overdue;

pub use dispatch::{
    notify_role_group, notify_role_group_best_effort, notify_user, notify_user_best_effort,
    FanOutReport,
};
pub use overdue::{run_overdue_sweep, SweepReport};
