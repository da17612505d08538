//! CLI Exit Code Registry
//!
//! Single source of truth for `cargos` exit codes. Scripts wrapping the
//! batch run rely on them.
//!
//! | Code | Meaning                                                        |
//! |------|----------------------------------------------------------------|
//! | 0    | Success, every record fully priced                             |
//! | 1    | General error                                                  |
//! | 2    | Usage error (bad arguments, missing template or catalog path)  |
//! | 3    | Catalog invalid (parse, validation, synonyms, column table)    |
//! | 4    | Request workbook unreadable                                    |
//! | 5    | Completed with issues (missing prices, review rows, outputs)   |
//! | 6    | Document merge failed (`combine`)                              |

use cargos_io::DocumentMergeError;

/// Success.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments or a required path not configured.
pub const EXIT_USAGE: u8 = 2;

/// Catalog could not be loaded, failed validation, or produced an
/// inconsistent index (duplicate synonym, unknown default, unmapped column).
pub const EXIT_CATALOG_INVALID: u8 = 3;

/// Request workbook missing, not a spreadsheet, or a sheet unreadable.
pub const EXIT_WORKBOOK_UNREADABLE: u8 = 4;

/// The run finished but some records are partial or need review, or a
/// document could not be written.
pub const EXIT_ISSUES: u8 = 5;

/// `combine` could not merge its inputs; no output was written.
pub const EXIT_MERGE_FAILED: u8 = 6;

pub fn merge_exit_code(err: &DocumentMergeError) -> u8 {
    match err {
        DocumentMergeError::EmptyInput => EXIT_USAGE,
        _ => EXIT_MERGE_FAILED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_ERROR,
            EXIT_USAGE,
            EXIT_CATALOG_INVALID,
            EXIT_WORKBOOK_UNREADABLE,
            EXIT_ISSUES,
            EXIT_MERGE_FAILED,
        ];
        let mut sorted = codes.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
    }

    #[test]
    fn empty_merge_is_a_usage_error() {
        assert_eq!(merge_exit_code(&DocumentMergeError::EmptyInput), EXIT_USAGE);
        let err = DocumentMergeError::MissingBody { path: "a.docx".into() };
        assert_eq!(merge_exit_code(&err), EXIT_MERGE_FAILED);
    }
}
