//! Host constants.

use std::time::Duration;

/// How long hook results stay in the status bar.
pub const STATUS_MESSAGE_DURATION: Duration = Duration::from_secs(5);

/// Title of the dialog showing a standalone script's result.
pub(crate) const RESULT_TITLE: &str = "Script result";

/// Title of the dialog showing a script failure.
pub(crate) const ERROR_TITLE: &str = "Script error";

/// Shown when a failed script gave no message.
pub(crate) const UNKNOWN_ERROR: &str = "unknown error";

/// Object name prefix of script menu actions.
pub(crate) const ACTION_NAME_PREFIX: &str = "Script: ";
