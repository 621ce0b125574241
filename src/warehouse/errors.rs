use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;

/// Errors raised while talking to the warehouse
#[derive(Debug, thiserror::Error)]
pub enum WarehouseError {
    /// Connection could not be established, pool exhausted or closed
    #[error("Warehouse unavailable: {0}")]
    Unavailable(String),
    /// The warehouse rejected or failed to execute the statement
    #[error("Query failed: {0}")]
    Query(String),
    /// A configured table or schema name is not a plain SQL identifier
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
    /// A result row did not have the expected shape
    #[error("Unexpected result: {0}")]
    Decode(String),
}

impl ResponseError for WarehouseError {
    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Self::Unavailable(_) => "Warehouse unavailable",
            Self::Query(_) => "Warehouse query failed",
            Self::InvalidIdentifier(_) => "Invalid warehouse configuration",
            Self::Decode(_) => "Unexpected warehouse response",
        };

        HttpResponse::build(self.status_code()).json(json!({
            "message": message,
            "details": self.to_string(),
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Query(_) => StatusCode::BAD_GATEWAY,
            Self::InvalidIdentifier(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Decode(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<sqlx::Error> for WarehouseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Self::Unavailable(err.to_string())
            }
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) => Self::Unavailable(err.to_string()),
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::Decode(_)
            | sqlx::Error::RowNotFound => Self::Decode(err.to_string()),
            other => Self::Query(other.to_string()),
        }
    }
}
