//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                                        |
//! |------|----------------------------------------------------------------|
//! | 0    | Success (row failures allowed unless `--strict`)               |
//! | 1    | Missing config, missing CSV for an explicit `--type`, or a     |
//! |      | pre-flight abort (unreadable / malformed CSV, row without name)|
//! | 2    | Usage error (rejected by the argument parser)                  |
//! | 3    | `--strict` and at least one row failed                         |

/// Success - every selected import ran.
pub const EXIT_SUCCESS: u8 = 0;

/// Run could not start, or an import aborted in pre-flight.
pub const EXIT_ERROR: u8 = 1;

/// Some rows failed to import and `--strict` was given.
pub const EXIT_ROW_ERRORS: u8 = 3;
