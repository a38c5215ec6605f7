//! Window shell error taxonomy

use thiserror::Error;

/// Window management errors
///
/// Every fallible shell operation returns one of these instead of panicking.
/// Running out of events is not an error: `poll_event` reports it as
/// [`WindowEvent::None`](crate::WindowEvent::None).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// Caller supplied an out-of-range value or used a destroyed context
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The display server could not be reached, or the connection was lost
    #[error("Display connection error: {0}")]
    Connection(String),

    /// A request to an already connected server failed
    #[error("X11 protocol error: {0}")]
    Protocol(String),

    /// The native window object could not be created
    #[error("Window creation failed: {0}")]
    CreationFailed(String),

    /// Anything that fits no other category
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Result alias used throughout the shell
pub type WindowResult<T> = Result<T, WindowError>;

impl From<x11rb::errors::ConnectError> for WindowError {
    fn from(err: x11rb::errors::ConnectError) -> Self {
        Self::Connection(err.to_string())
    }
}

impl From<x11rb::errors::ConnectionError> for WindowError {
    fn from(err: x11rb::errors::ConnectionError) -> Self {
        Self::Connection(err.to_string())
    }
}

impl From<x11rb::errors::ReplyError> for WindowError {
    fn from(err: x11rb::errors::ReplyError) -> Self {
        match err {
            x11rb::errors::ReplyError::ConnectionError(inner) => inner.into(),
            x11rb::errors::ReplyError::X11Error(x_err) => {
                Self::Protocol(format!("{:?} from request {}", x_err.error_kind, x_err.major_opcode))
            }
        }
    }
}

impl From<x11rb::errors::ReplyOrIdError> for WindowError {
    fn from(err: x11rb::errors::ReplyOrIdError) -> Self {
        match err {
            x11rb::errors::ReplyOrIdError::IdsExhausted => {
                Self::CreationFailed("X11 resource ids exhausted".to_string())
            }
            x11rb::errors::ReplyOrIdError::ConnectionError(inner) => inner.into(),
            x11rb::errors::ReplyOrIdError::X11Error(x_err) => {
                Self::Protocol(format!("{:?} from request {}", x_err.error_kind, x_err.major_opcode))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_kind() {
        let err = WindowError::InvalidParameter("width 10 below minimum 400".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: width 10 below minimum 400");

        let err = WindowError::CreationFailed("bad value".to_string());
        assert!(err.to_string().starts_with("Window creation failed"));
    }

    #[test]
    fn test_connection_errors_map_to_connection_kind() {
        let err: WindowError = x11rb::errors::ConnectionError::UnknownError.into();
        assert!(matches!(err, WindowError::Connection(_)));

        let err: WindowError =
            x11rb::errors::ReplyError::ConnectionError(x11rb::errors::ConnectionError::UnknownError).into();
        assert!(matches!(err, WindowError::Connection(_)));
    }

    #[test]
    fn test_exhausted_ids_are_a_creation_failure() {
        let err: WindowError = x11rb::errors::ReplyOrIdError::IdsExhausted.into();
        assert!(matches!(err, WindowError::CreationFailed(_)));
    }
}
