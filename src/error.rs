use thiserror::Error;

#[derive(Debug, Error)]
pub enum RssGraphError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("database error: {0}")]
    Database(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("runtime error: {0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, RssGraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_the_kind() {
        let err = RssGraphError::Config("x".to_string());
        assert!(format!("{err}").contains("configuration error"));
        let err = RssGraphError::Database("locked".to_string());
        assert_eq!(err.to_string(), "database error: locked");
    }
}
