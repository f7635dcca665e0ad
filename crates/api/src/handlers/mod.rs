pub mod auth;
pub mod funds;
pub mod notifications;
pub mod pins;
pub mod support;
pub mod users;
