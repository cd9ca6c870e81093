use thiserror::Error;
use tracing::error;
use uuid::Uuid;
use validator::ValidationErrors;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("validation failed on `{field}`: {message}")]
    Validation { field: String, message: String },

    #[error("comment with id [{0}] not found")]
    CommentNotFound(Uuid),

    #[error("post with id [{0}] not found")]
    PostNotFound(Uuid),

    #[error("database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CommentNotFound(_) | Self::PostNotFound(_))
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        error!("Database error: {:?}", err);
        Self::DatabaseError(err)
    }
}

// Reports a single field; names are compared so the choice is stable.
impl From<ValidationErrors> for Error {
    fn from(errs: ValidationErrors) -> Self {
        let field_errors = errs.field_errors();
        let mut fields: Vec<_> = field_errors.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));

        match fields.first() {
            Some((field, list)) => {
                let message = list
                    .first()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .unwrap_or_else(|| "invalid value".to_string());

                Self::Validation {
                    field: field.to_string(),
                    message,
                }
            }
            None => Self::Validation {
                field: String::new(),
                message: errs.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn validation_errors_report_first_field_by_name() {
        let mut errs = ValidationErrors::new();
        errs.add(
            "title",
            ValidationError::new("length").with_message("Title is required".into()),
        );
        errs.add(
            "contents",
            ValidationError::new("length").with_message("Contents are required".into()),
        );

        match Error::from(errs) {
            Error::Validation { field, message } => {
                assert_eq!(field, "contents");
                assert_eq!(message, "Contents are required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn validation_error_falls_back_to_code() {
        let mut errs = ValidationErrors::new();
        errs.add("title", ValidationError::new("length"));

        match Error::from(errs) {
            Error::Validation { field, message } => {
                assert_eq!(field, "title");
                assert_eq!(message, "length");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn comment_not_found_names_the_id() {
        let id = Uuid::now_v7();
        let err = Error::CommentNotFound(id);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), format!("comment with id [{id}] not found"));
    }
}
