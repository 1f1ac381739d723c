//! Domain-level constants.
//!
//! These mirror the column limits of the persisted `users` table.

// =============================================================================
// Validation
// =============================================================================

/// Minimum name length requirement
pub const MIN_NAME_LENGTH: u64 = 1;

/// Maximum name length (column is VARCHAR(100))
pub const MAX_NAME_LENGTH: u64 = 100;

/// Maximum email length (column is VARCHAR(100))
pub const MAX_EMAIL_LENGTH: u64 = 100;
