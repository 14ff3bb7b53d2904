use thiserror::Error;

use crate::queue::TransportError;

/// Failure of a publish operation
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    ConfigurationMissing,
    Transport,
}

impl PublishError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PublishError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            PublishError::ConfigurationMissing(_) => ErrorKind::ConfigurationMissing,
            PublishError::Transport(_) => ErrorKind::Transport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(
            PublishError::InvalidArgument("x".into()).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            PublishError::ConfigurationMissing("x".into()).kind(),
            ErrorKind::ConfigurationMissing
        );
        let err: PublishError = TransportError::Rejected("throttled".into()).into();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_transport_message_passes_through() {
        let err: PublishError = TransportError::Rejected("throttled".into()).into();
        assert_eq!(err.to_string(), TransportError::Rejected("throttled".into()).to_string());
    }
}
