//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Scripts that drive `stocklink` branch on these values.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (unspecified)                          |
//! | 2    | CLI usage error (bad args, raised by clap)           |
//! | 3    | One or more of the four input files missing          |
//! | 4    | Required columns absent from an input                |
//! | 5    | Input could not be read or parsed                    |
//! | 6    | Output workbook could not be written                 |
//! | 7    | Config file invalid                                  |

use stocklink_recon::LinkError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments. clap exits with this itself.
pub const EXIT_USAGE: u8 = 2;

/// An input flag was not given or points at a file that does not exist.
pub const EXIT_MISSING_INPUT: u8 = 3;

/// Validation found required columns absent from at least one table.
pub const EXIT_MISSING_COLUMNS: u8 = 4;

/// Read or parse error loading an input file.
pub const EXIT_READ: u8 = 5;

/// Writing the output workbook failed.
pub const EXIT_WRITE: u8 = 6;

/// Config file unreadable, unparsable or failing validation.
pub const EXIT_INVALID_CONFIG: u8 = 7;

/// Map an engine error to its exit code.
pub fn link_exit_code(err: &LinkError) -> u8 {
    match err {
        LinkError::ConfigParse(_) | LinkError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        LinkError::MissingInput(_) => EXIT_MISSING_INPUT,
        LinkError::MissingColumns(_) => EXIT_MISSING_COLUMNS,
        LinkError::Io(_) => EXIT_READ,
    }
}
