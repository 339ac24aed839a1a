use miette::Diagnostic;
use sea_orm::DbErr;

#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum Error {
    #[error("{message}")]
    #[diagnostic(code(fishery::validation))]
    Validation { field: String, message: String },

    #[error("{kind} `{id}` not found")]
    #[diagnostic(code(fishery::not_found))]
    NotFound { kind: &'static str, id: String },

    #[error("{0}")]
    #[diagnostic(code(fishery::conflict))]
    Conflict(String),

    #[error("database error: {0}")]
    #[diagnostic(code(fishery::database))]
    Database(#[from] DbErr),

    #[error("Stored document of {kind} `{id}` is malformed")]
    #[diagnostic(code(fishery::document))]
    Document { kind: &'static str, id: String },
}

impl Error {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
