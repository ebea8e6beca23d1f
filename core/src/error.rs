#[derive(Debug, thiserror::Error)]
pub enum SurnameError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("DATABASE_URL not configured")]
    DatabaseUrlMissing,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("Unsupported type {type_name} in column {column}")]
    UnsupportedColumnType { column: String, type_name: String },
}

impl SurnameError {
    /// Status code for errors the endpoint answers itself. Everything else
    /// is left to the hosting runtime.
    pub fn status(&self) -> Option<u16> {
        match self {
            SurnameError::MethodNotAllowed => Some(405),
            SurnameError::DatabaseUrlMissing => Some(500),
            SurnameError::Database(_)
            | SurnameError::Json(_)
            | SurnameError::UnsupportedColumnType { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_request_errors_have_a_status() {
        assert_eq!(SurnameError::MethodNotAllowed.status(), Some(405));
        assert_eq!(SurnameError::DatabaseUrlMissing.status(), Some(500));
        assert_eq!(SurnameError::Database(sqlx::Error::PoolClosed).status(), None);
    }

    #[test]
    fn messages_match_the_wire_format() {
        assert_eq!(SurnameError::MethodNotAllowed.to_string(), "Method not allowed");
        assert_eq!(SurnameError::DatabaseUrlMissing.to_string(), "DATABASE_URL not configured");
    }
}
