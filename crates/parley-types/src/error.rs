use thiserror::Error;

/// Errors from session store operations (used by trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from completion gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway request failed: {message}")]
    Http { message: String },

    #[error("gateway returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("rate limited")]
    RateLimited,

    #[error("gateway overloaded: {0}")]
    Overloaded(String),
}

/// Errors from session service operations.
///
/// Every variant is terminal for the invocation that produced it: no
/// operation retries, and no partial state is left behind for the quota,
/// validation, or failed-initialize paths.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session owner mismatch")]
    OwnerMismatch,

    #[error("session '{0}' not found")]
    NotFound(String),

    #[error("session limit of {0} reached for this owner")]
    OwnerQuotaExceeded(u32),

    #[error("message limit of {0} reached for this session")]
    MessageQuotaExceeded(u32),

    #[error("session was modified concurrently, retry the call")]
    Conflict,

    #[error("completion gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_session_error_display() {
        let err = SessionError::MessageQuotaExceeded(100);
        assert_eq!(
            err.to_string(),
            "message limit of 100 reached for this session"
        );
    }

    #[test]
    fn test_gateway_error_wraps_into_session_error() {
        let err: SessionError = GatewayError::RateLimited.into();
        assert!(matches!(err, SessionError::Gateway(_)));
        assert!(err.to_string().contains("rate limited"));
    }

    #[test]
    fn test_store_conflict_is_distinct_from_session_conflict() {
        let err: SessionError = StoreError::Conflict("revision 3 expected".to_string()).into();
        assert!(matches!(err, SessionError::Store(StoreError::Conflict(_))));
    }
}
