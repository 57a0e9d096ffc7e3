//! Subcommand implementations.

pub mod check;
pub mod init;
pub mod list_rules;
pub mod output;

/// Exit status for a run with failing findings.
pub const EXIT_FAIL: u8 = 1;

/// Exit status for an indeterminate run, a usage error or an I/O failure.
pub const EXIT_ERROR: u8 = 2;
