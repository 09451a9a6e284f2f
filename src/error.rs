//! # Errores del pipeline
//! src/error.rs
//!
//! Cada etapa (parser, resolver, lectura del archivo) retorna un
//! `ServeError`. El handler de conexión lo traduce a exactamente una
//! respuesta HTTP con `status()` y `public_message()`.

use crate::http::StatusCode;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Method {0} not allowed")]
    UnsupportedMethod(String),

    #[error("Traversal attempt: {0}")]
    TraversalAttempt(String),

    #[error("Path escapes document root: {0}")]
    OutOfRoot(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Unexpected failure: {0}")]
    Unexpected(#[from] io::Error),
}

impl ServeError {
    /// Código HTTP asociado a la variante
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::MalformedRequest(_) => StatusCode::BadRequest,
            ServeError::UnsupportedMethod(_) => StatusCode::MethodNotAllowed,
            ServeError::TraversalAttempt(_)
            | ServeError::OutOfRoot(_)
            | ServeError::PermissionDenied(_) => StatusCode::Forbidden,
            ServeError::NotFound(_) => StatusCode::NotFound,
            ServeError::Unexpected(_) => StatusCode::InternalServerError,
        }
    }

    /// Mensaje visible para el cliente
    ///
    /// Nunca incluye rutas del sistema de archivos ni detalles de I/O;
    /// solo el path que el propio cliente pidió.
    pub fn public_message(&self) -> String {
        match self {
            ServeError::MalformedRequest(reason) => format!("Malformed request: {}", reason),
            ServeError::UnsupportedMethod(method) => format!("Method {} is not allowed", method),
            ServeError::TraversalAttempt(_) | ServeError::OutOfRoot(_) => {
                "Access forbidden".to_string()
            }
            ServeError::NotFound(path) => format!("Resource not found: {}", path),
            ServeError::PermissionDenied(_) => "Permission denied".to_string(),
            ServeError::Unexpected(_) => "Internal server error".to_string(),
        }
    }

    /// Traduce un error de I/O sobre `path` (el path pedido por el cliente)
    pub fn from_io(err: io::Error, path: &str) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ServeError::NotFound(path.to_string()),
            io::ErrorKind::PermissionDenied => ServeError::PermissionDenied(path.to_string()),
            _ => ServeError::Unexpected(err),
        }
    }
}
