//! Crate-wide error type.
//!
//! Every fallible operation returns `Result<_, AppError>`. The exit code is
//! only meaningful for the `covid` binary:
//!
//! - `2`: usage / configuration problems
//! - `4`: data or I/O failures (network, parse, file writes, terminal)

/// Exit code for usage and configuration errors.
pub const EXIT_USAGE: u8 = 2;
/// Exit code for data, network and I/O errors.
pub const EXIT_DATA: u8 = 4;

/// Message shown to the user whenever the series cannot be loaded.
pub const DATA_UNAVAILABLE: &str = "Failed to load COVID data. Please try again later.";

#[derive(Clone, PartialEq, Eq)]
pub struct AppError {
    exit_code: u8,
    message: String,
    data_unavailable: bool,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
            data_unavailable: false,
        }
    }

    /// The single loader failure category: bad status, transport error or
    /// malformed body all collapse into this.
    pub fn data_unavailable(detail: impl Into<String>) -> Self {
        Self {
            exit_code: EXIT_DATA,
            message: detail.into(),
            data_unavailable: true,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_data_unavailable(&self) -> bool {
        self.data_unavailable
    }

    /// Text for the widget's error overlay.
    pub fn user_message(&self) -> &str {
        if self.data_unavailable {
            DATA_UNAVAILABLE
        } else {
            &self.message
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .field("data_unavailable", &self.data_unavailable)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_unavailable_hides_detail_from_user() {
        let err = AppError::data_unavailable("request failed with status 500");
        assert!(err.is_data_unavailable());
        assert_eq!(err.exit_code(), EXIT_DATA);
        assert_eq!(err.user_message(), DATA_UNAVAILABLE);
        assert_eq!(err.to_string(), "request failed with status 500");
    }

    #[test]
    fn plain_errors_show_their_message() {
        let err = AppError::new(EXIT_USAGE, "bad flag");
        assert!(!err.is_data_unavailable());
        assert_eq!(err.user_message(), "bad flag");
    }
}
