//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Workflow transitions are
//! compare-and-swap updates guarded on the current status, so concurrent
//! actors cannot double-apply an action.

pub mod notification_repo;
pub mod pin_repo;
pub mod requisition_repo;
pub mod role_repo;
pub mod support_repo;
pub mod user_repo;

pub use notification_repo::NotificationRepo;
pub use pin_repo::PinRepo;
pub use requisition_repo::RequisitionRepo;
pub use role_repo::RoleRepo;
pub use support_repo::SupportRepo;
pub use user_repo::UserRepo;
