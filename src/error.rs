use actix_web::http::StatusCode;
use thiserror::Error;

/// Failures below the ledger client that are not a plain "transaction not found".
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("RPC transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Failed to decode RPC response: {0}")]
    Decode(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Persistence is not configured: {0}")]
    NotConfigured(String),

    #[error("Database error: {0}")]
    Database(String),
}

#[derive(Debug)]
pub enum ErrorKind {
    InvalidInput(String),
    NotFound(String),
    RPCError(String),
    DBError(String),
    InternalError(String),
}

/// JSON body returned for every failed request. `code` doubles as the HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Error {
    pub code: u16,
    pub message: String,
    /// The same request may succeed if submitted again.
    pub retriable: bool,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let retriable = if self.retriable { " (retriable)" } else { "" };
        write!(f, "Error #{}{}: {}", self.code, retriable, self.message)
    }
}

impl Error {
    pub fn from_error_kind(err: ErrorKind) -> Self {
        match err {
            ErrorKind::InvalidInput(message) => Self {
                code: 400,
                message,
                retriable: false,
            },
            ErrorKind::NotFound(message) => Self {
                code: 404,
                message,
                retriable: false,
            },
            ErrorKind::RPCError(message) => Self {
                code: 502,
                message: format!("RPC error: {}", message),
                retriable: true,
            },
            ErrorKind::DBError(message) => Self {
                code: 500,
                message: format!("DB error: {}", message),
                retriable: true,
            },
            ErrorKind::InternalError(message) => Self {
                code: 500,
                message: format!("Internal error: {}", message),
                retriable: true,
            },
        }
    }
}

impl<T> From<T> for Error
where
    T: Into<ErrorKind>,
{
    fn from(err: T) -> Self {
        Self::from_error_kind(err.into())
    }
}

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code()).json(self)
    }
}

impl From<LedgerError> for ErrorKind {
    fn from(error: LedgerError) -> Self {
        Self::RPCError(error.to_string())
    }
}

impl From<StoreError> for ErrorKind {
    fn from(error: StoreError) -> Self {
        Self::DBError(error.to_string())
    }
}

impl From<serde_json::Error> for ErrorKind {
    fn from(error: serde_json::Error) -> Self {
        Self::InvalidInput(format!("Invalid JSON payload: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn ledger_errors_are_retriable_bad_gateway() {
        let err: Error = LedgerError::Decode("missing jsonrpc".to_string()).into();
        assert_eq!(err.code, 502);
        assert!(err.retriable);
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn unconfigured_store_surfaces_as_server_error() {
        let err: Error = StoreError::NotConfigured("DATABASE_URL is not set".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message.contains("DATABASE_URL is not set"));
    }

    #[test]
    fn invalid_input_is_not_retriable() {
        let err = Error::from_error_kind(ErrorKind::InvalidInput("bad".to_string()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(!err.retriable);
        assert_eq!(err.to_string(), "Error #400: bad");
    }
}
