//! Domain core for the chambers practice-management backend.
//!
//! Pure, I/O-free building blocks shared by the persistence and API crates:
//! the error taxonomy, the role/capability matrix, the fund-requisition
//! state machine, the notification event catalogue, and small validation
//! and formatting helpers.

pub mod currency;
pub mod error;
pub mod notification;
pub mod pin;
pub mod requisition;
pub mod roles;
pub mod support;
pub mod types;
