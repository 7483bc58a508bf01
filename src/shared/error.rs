use std::fmt;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems and host scripts to distinguish a policy
/// block from an operational failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - the artifact is allowed
    Success = 0,
    /// The artifact was blocked by the security threshold or license policy
    PolicyViolation = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (configuration, metadata store, I/O, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::PolicyViolation => write!(f, "Policy Violation (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Errors raised while resolving, fetching or reading scan data.
///
/// Every variant is fail-open: callers log it and let the artifact through.
/// Policy blocks are not errors; they travel as `Decision::Block`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GateError {
    #[error("Authentication failed with status code {status}")]
    AuthenticationFailed { status: u16 },

    #[error("Unexpected authentication response: {body}")]
    UnexpectedAuthResponse { body: String },

    #[error("User is not authenticated")]
    UserNotAuthenticated,

    #[error("Failed to refresh the access token")]
    FailedToRefreshToken,

    #[error("Unexpected response code: {code}")]
    UnexpectedResponseCode { code: u16 },

    #[error("Unexpected response body: {body}")]
    UnexpectedResponseBody { body: String },

    #[error("Invalid artifact coordinate (package type: {package_type}, name: {name:?}, version: {version:?})")]
    CoordinateInvalid {
        package_type: String,
        name: Option<String>,
        version: Option<String>,
    },

    #[error("Request failed before a response was received: {details}")]
    Transport { details: String },

    #[error("Scan record of {location} has an unreadable '{key}' property")]
    InvalidScanRecord { location: String, key: String },

    #[error("Operation cancelled")]
    Cancelled,
}

impl GateError {
    /// Status code carried by the error, when the remote side answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GateError::AuthenticationFailed { status } => Some(*status),
            GateError::UnexpectedResponseCode { code } => Some(*code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

impl From<reqwest::Error> for GateError {
    fn from(err: reqwest::Error) -> Self {
        GateError::Transport {
            details: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::PolicyViolation.as_i32(), 1);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 3);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(
            format!("{}", ExitCode::PolicyViolation),
            "Policy Violation (1)"
        );
        assert_eq!(
            format!("{}", ExitCode::InvalidArguments),
            "Invalid Arguments (2)"
        );
        assert_eq!(
            format!("{}", ExitCode::ApplicationError),
            "Application Error (3)"
        );
    }

    #[test]
    fn test_status_code_extraction() {
        assert_eq!(
            GateError::UnexpectedResponseCode { code: 404 }.status_code(),
            Some(404)
        );
        assert_eq!(
            GateError::AuthenticationFailed { status: 400 }.status_code(),
            Some(400)
        );
        assert_eq!(GateError::FailedToRefreshToken.status_code(), None);
    }

    #[test]
    fn test_is_not_found() {
        assert!(GateError::UnexpectedResponseCode { code: 404 }.is_not_found());
        assert!(!GateError::UnexpectedResponseCode { code: 500 }.is_not_found());
        assert!(!GateError::UserNotAuthenticated.is_not_found());
    }

    #[test]
    fn test_coordinate_invalid_display() {
        let error = GateError::CoordinateInvalid {
            package_type: "npm".to_string(),
            name: Some("lodash".to_string()),
            version: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("npm"));
        assert!(display.contains("lodash"));
        assert!(display.contains("None"));
    }

    #[test]
    fn test_invalid_scan_record_display() {
        let error = GateError::InvalidScanRecord {
            location: "npm-local/lodash".to_string(),
            key: "Sca.HighRisksCount".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("npm-local/lodash"));
        assert!(display.contains("Sca.HighRisksCount"));
    }
}
