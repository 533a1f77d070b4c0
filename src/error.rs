use uuid::Uuid;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Test not found: {0}")]
    TestNotFound(Uuid),

    #[error("Question not found: {0}")]
    QuestionNotFound(Uuid),

    #[error("Attempt not found: {0}")]
    AttemptNotFound(Uuid),

    #[error("Invalid answer: {0}")]
    InvalidAnswer(String),

    #[error("Question {question_id} does not belong to test {test_id}")]
    QuestionNotInTest { question_id: Uuid, test_id: Uuid },

    #[error("Question {question_id} has already been answered in attempt {attempt_id}")]
    DuplicateAnswer { attempt_id: Uuid, question_id: Uuid },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse failure classes a transport layer maps onto its own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Conflict,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_)
            | Error::TestNotFound(_)
            | Error::QuestionNotFound(_)
            | Error::AttemptNotFound(_) => ErrorKind::NotFound,
            Error::BadRequest(_)
            | Error::InvalidAnswer(_)
            | Error::QuestionNotInTest { .. }
            | Error::Validation(_) => ErrorKind::Validation,
            Error::DuplicateAnswer { .. } | Error::Conflict(_) => ErrorKind::Conflict,
            Error::Config(_)
            | Error::Database(_)
            | Error::Migrate(_)
            | Error::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}
