pub mod notification;
pub mod pin;
pub mod requisition;
pub mod role;
pub mod support;
pub mod user;
