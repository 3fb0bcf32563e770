use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type RosterResult<T> = Result<T, RosterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category_prefix() {
        let err = RosterError::Config("threshold must be within [0, 1]".to_owned());
        assert_eq!(
            err.to_string(),
            "configuration error: threshold must be within [0, 1]"
        );
    }
}
