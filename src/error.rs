use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DnsError {
    #[error("malformed DNS message")]
    FormatError,

    #[error("invalid domain name: {0}")]
    InvalidName(String),
}

/// Failure of a single exchange with a single server.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("query timed out")]
    Timeout,

    #[error("unexpected response: {0}")]
    Protocol(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DnsError> for TransportError {
    fn from(value: DnsError) -> Self {
        Self::Protocol(value.to_string())
    }
}
