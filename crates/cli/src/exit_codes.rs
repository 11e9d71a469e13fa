//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3-9     | intake           | Reading and classifying export files     |
//! | 10-19   | export           | Producing and delivering export payloads |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
#[allow(dead_code)]
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Intake (3-9)
// =============================================================================

/// A source could not be read; intake stopped with partial results.
pub const EXIT_INTAKE_FATAL: u8 = 3;

/// No followers or following list was recognized in any input.
pub const EXIT_INTAKE_EMPTY: u8 = 4;

/// Intake finished but produced warnings, and `--strict` was given.
pub const EXIT_INTAKE_WARNINGS: u8 = 5;

// =============================================================================
// Export (10-19)
// =============================================================================

/// The payload was built but could not be written to its destination.
pub const EXIT_EXPORT_WRITE: u8 = 10;

/// The payload could not be serialized.
pub const EXIT_EXPORT_SERIALIZE: u8 = 11;
