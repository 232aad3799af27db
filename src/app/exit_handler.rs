//! Exit code logic for the playlistdl process.
//!
//! Single responsibility: map batch counts to the process exit outcome.

use crate::ProcessExit;

/// Determines the process exit outcome from batch counts.
///
/// A batch that downloaded nothing is a failure, even when every item was
/// only skipped.
pub(crate) fn determine_exit_outcome(success: usize, failed: usize, skipped: usize) -> ProcessExit {
    if success == 0 {
        ProcessExit::Failure
    } else if failed + skipped == 0 {
        ProcessExit::Success
    } else {
        ProcessExit::Partial
    }
}
