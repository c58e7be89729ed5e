// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use std::fmt;
use std::process::ExitCode;

/// CLI-specific error type with exit code mapping
#[derive(Debug)]
pub enum CliError {
    /// Invalid command-line arguments
    InvalidArgs(String),
    /// A field value does not fit its bit field
    OutOfRange(String),
    /// Argument layout cannot be sized
    UnsupportedLayout(String),
    /// General error
    General(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InvalidArgs(msg) => write!(f, "Invalid arguments: {}", msg),
            CliError::OutOfRange(msg) => write!(f, "Out of range: {}", msg),
            CliError::UnsupportedLayout(msg) => write!(f, "Unsupported layout: {}", msg),
            CliError::General(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::InvalidArgs(_) => ExitCode::from(2),
            CliError::OutOfRange(_) => ExitCode::from(3),
            CliError::UnsupportedLayout(_) => ExitCode::from(4),
            CliError::General(_) => ExitCode::from(1),
        }
    }
}

/// Map ioctl_numbers::Error to CliError with appropriate exit codes
impl From<ioctl_numbers::Error> for CliError {
    fn from(err: ioctl_numbers::Error) -> Self {
        use ioctl_numbers::Error;

        match err {
            Error::InvalidFieldRange { .. } => CliError::OutOfRange(err.to_string()),
            Error::UnsupportedLayout { position, issue } => CliError::UnsupportedLayout(format!(
                "{} (at position {})",
                issue, position
            )),
        }
    }
}

/// Helper function to convert result to exit code
pub fn result_to_exit_code<T>(result: Result<T, CliError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            e.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ioctl_numbers::code::CodeField;
    use ioctl_numbers::layout::LayoutIssue;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            CliError::InvalidArgs("test".into()).exit_code(),
            ExitCode::from(2)
        );
        assert_eq!(
            CliError::OutOfRange("test".into()).exit_code(),
            ExitCode::from(3)
        );
        assert_eq!(
            CliError::UnsupportedLayout("test".into()).exit_code(),
            ExitCode::from(4)
        );
        assert_eq!(
            CliError::General("test".into()).exit_code(),
            ExitCode::from(1)
        );
    }

    #[test]
    fn test_from_library_error() {
        let err: CliError = ioctl_numbers::Error::InvalidFieldRange {
            field: CodeField::Number,
            value: 0x100,
            max: 0xff,
        }
        .into();
        assert_eq!(
            format!("{}", err),
            "Out of range: number field out of range: 0x100 exceeds 0xff"
        );

        let err: CliError = ioctl_numbers::Error::UnsupportedLayout {
            position: 0,
            issue: LayoutIssue::NativeAlignment,
        }
        .into();
        assert!(matches!(err, CliError::UnsupportedLayout(_)));
    }

    #[test]
    fn test_error_display() {
        let err = CliError::InvalidArgs("bad".to_string());
        assert_eq!(format!("{}", err), "Invalid arguments: bad");
    }
}
