use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while fetching or publishing a comic.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure: connection refused, timeout, truncated body.
    #[error("{0}")]
    Reqwest(#[from] reqwest::Error),

    /// The HTTP client could not be built.
    #[error("could not start up the client: {0}")]
    ClientFormation(#[source] reqwest::Error),

    /// A response arrived with a non-success status.
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus {
        /// Status returned by the remote end.
        status: StatusCode,
        /// Requested URL, without query parameters.
        url: String,
    },

    /// A successful HTTP response that carries an embedded error payload.
    #[error("{method} failed with error {code}: {message}")]
    Api {
        /// Platform method (or `upload`) that reported the error.
        method: String,
        /// Platform error code, `0` when the payload did not carry one.
        code: i64,
        /// Human readable message from the platform.
        message: String,
    },

    /// A response body did not have the expected shape.
    #[error("malformed response: {0}")]
    Data(String),

    /// No valid comic index could be used.
    #[error("comic index {0} is out of range")]
    InvalidIndex(u32),

    /// A required environment variable is not set.
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    /// An environment variable is set but unusable.
    #[error("invalid value for {name}: {reason}")]
    InvalidVar {
        /// Variable name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Local file I/O on the downloaded image.
    #[error("{}", _0)]
    IO(#[from] std::io::Error),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure or non-2xx status.
    Network,
    /// 2xx response with an embedded error payload.
    Api,
    /// Response missing expected fields, or an unusable index.
    Data,
    /// Local filesystem failure.
    Io,
    /// Configuration or client setup failure.
    Config,
}

impl Error {
    /// Returns the class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Reqwest(_) | Error::UnexpectedStatus { .. } => ErrorKind::Network,
            Error::Api { .. } => ErrorKind::Api,
            Error::Data(_) | Error::InvalidIndex(_) => ErrorKind::Data,
            Error::IO(_) => ErrorKind::Io,
            Error::ClientFormation(_) | Error::MissingVar(_) | Error::InvalidVar { .. } => {
                ErrorKind::Config
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_are_not_network_errors() {
        let err = Error::Api {
            method: "wall.post".into(),
            code: 15,
            message: "Access denied".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.to_string(), "wall.post failed with error 15: Access denied");

        let err = Error::UnexpectedStatus {
            status: StatusCode::BAD_GATEWAY,
            url: "https://xkcd.com/info.0.json".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Network);
    }
}
