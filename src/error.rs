use thiserror::Error;

use crate::dispatch::OperationKind;

/// Operator-facing failures. None of these end the shell; the display text
/// is what gets printed before control returns to a prompt or the menu.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShellError {
    #[error(
        "You have made an invalid selection. Please choose a command to execute by entering I, R, C, H, or Q."
    )]
    InvalidSelection,

    #[error("Invalid option")]
    InvalidOption,

    #[error("Invalid theme source: {0}")]
    InvalidSource(String),

    #[error("Confirmation failure, operation aborted!")]
    ConfirmationMismatch,

    #[error("{operation} exited with status {code}")]
    SubOperationFailed { operation: OperationKind, code: i32 },

    #[error("There are no {0} themes!")]
    NoCandidates(&'static str),

    #[error("Theme not found: {0}")]
    UnknownTheme(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_candidate_lists_read_naturally() {
        assert_eq!(
            ShellError::NoCandidates("disabled").to_string(),
            "There are no disabled themes!"
        );
        assert_eq!(
            ShellError::NoCandidates("installed").to_string(),
            "There are no installed themes!"
        );
    }

    #[test]
    fn sub_operation_failure_names_operation_and_status() {
        let err = ShellError::SubOperationFailed {
            operation: OperationKind::Activate,
            code: 2,
        };
        assert_eq!(err.to_string(), "theme activation exited with status 2");
    }

    #[test]
    fn prompt_errors_match_shell_messages() {
        assert_eq!(ShellError::InvalidOption.to_string(), "Invalid option");
        assert_eq!(
            ShellError::ConfirmationMismatch.to_string(),
            "Confirmation failure, operation aborted!"
        );
        assert!(
            ShellError::InvalidSelection
                .to_string()
                .ends_with("entering I, R, C, H, or Q.")
        );
        assert_eq!(
            ShellError::UnknownTheme("Blog".to_string()).to_string(),
            "Theme not found: Blog"
        );
    }
}
