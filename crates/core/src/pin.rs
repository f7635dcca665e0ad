//! Approval PIN format rules and lockout policy constants.

use crate::error::CoreError;

/// Consecutive verification failures before the credential locks.
pub const MAX_FAILED_ATTEMPTS: i32 = 5;

/// How long a locked credential stays locked, in minutes.
pub const LOCKOUT_MINUTES: i64 = 15;

/// A PIN is 4 to 6 ASCII digits. Anything else is rejected before it
/// reaches the hasher.
pub fn validate_pin_format(pin: &str) -> Result<(), CoreError> {
    let len = pin.len();
    if !(4..=6).contains(&len) || !pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::Validation(
            "PIN must be 4 to 6 digits".to_string(),
        ));
    }
    Ok(())
}
