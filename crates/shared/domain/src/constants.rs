//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Validation
// =============================================================================

/// Minimum username length once surrounding whitespace is ignored
pub const MIN_USERNAME_LENGTH: usize = 1;

/// Name of the entity reported in uniqueness conflicts
pub const USERNAME_FIELD: &str = "Username";
