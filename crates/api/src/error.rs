use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use roster_core::error::CoreError;
use roster_core::record::RecordKind;
use roster_core::types::DbId;

/// Generic body for failures that are not tied to one record operation.
pub const INTERNAL_ERROR_MESSAGE: &str = "Error interno del servidor.";

/// The gateway operation a storage failure happened in.
///
/// Each operation has its own log line and its own user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    UpdateName,
    Delete,
}

impl Operation {
    /// Server-side log message, e.g. `Error en POST /characters/:id`.
    pub fn log_message(self, kind: RecordKind) -> String {
        let base = kind.base_path();
        match self {
            Self::List => format!("Error al listar {}", kind.plural()),
            Self::Get => format!("Error en GET {base}/:id"),
            Self::Create => format!("Error en POST {base}"),
            Self::Update => format!("Error en POST {base}/:id"),
            Self::UpdateName => format!("Error en POST {base}/:id/name"),
            Self::Delete => format!("Error en POST {base}/:id/delete"),
        }
    }

    /// Plain-text body sent with the 500 response.
    pub fn user_message(self, kind: RecordKind) -> String {
        match self {
            Self::List => format!("Error al cargar la lista de {}.", kind.plural()),
            Self::Get => format!("Error al obtener el {}.", kind.singular()),
            Self::Create => format!("No se pudo crear el {}.", kind.singular()),
            Self::Update => format!("No se pudo actualizar el {}.", kind.singular()),
            Self::UpdateName => "No se pudo actualizar el nombre.".to_string(),
            Self::Delete => format!("No se pudo eliminar el {}.", kind.singular()),
        }
    }
}

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce plain-text error pages.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `roster_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error raised while performing `operation`.
    #[error("Database error during {operation:?} on {kind}: {source}")]
    Storage {
        kind: RecordKind,
        operation: Operation,
        #[source]
        source: sqlx::Error,
    },

    /// A template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    pub fn not_found(kind: RecordKind, id: DbId) -> Self {
        Self::Core(CoreError::NotFound { kind, id })
    }

    /// Adapter for `map_err` on store calls.
    pub fn storage(kind: RecordKind, operation: Operation) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Storage {
            kind,
            operation,
            source,
        }
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { kind, .. } => {
                    (StatusCode::NOT_FOUND, kind.not_found_message().to_string())
                }
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
                CoreError::Storage(err) => {
                    tracing::error!(error = %err, "Image storage error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        INTERNAL_ERROR_MESSAGE.to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Storage {
                kind,
                operation,
                source,
            } => {
                tracing::error!(error = %source, "{}", operation.log_message(kind));
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    operation.user_message(kind),
                )
            }

            // --- HTTP-specific errors ---
            AppError::Template(err) => {
                tracing::error!(error = ?err, "Template render error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        (status, message).into_response()
    }
}
