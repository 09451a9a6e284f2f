//! # Códigos de Estado HTTP
//! src/http/status.rs
//!
//! Tabla cerrada de códigos que el servidor de archivos puede emitir:
//!
//! - **2xx**: Éxito (200 OK)
//! - **4xx**: Error del cliente (400, 403, 404, 405)
//! - **5xx**: Error del servidor (500)
//!
//! Cualquier otro código numérico se imprime con la frase `Unknown`.

/// Representa los códigos de estado HTTP que soporta nuestro servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK - El archivo se encontró y se envía
    Ok = 200,

    /// 400 Bad Request - Request line malformada
    BadRequest = 400,

    /// 403 Forbidden - Intento de traversal o permiso denegado
    Forbidden = 403,

    /// 404 Not Found - El recurso no existe
    NotFound = 404,

    /// 405 Method Not Allowed - Método distinto de GET/HEAD
    MethodNotAllowed = 405,

    /// 500 Internal Server Error - Error inesperado
    InternalServerError = 500,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use redunix_static::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Busca el código en la tabla cerrada
    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            200 => Some(StatusCode::Ok),
            400 => Some(StatusCode::BadRequest),
            403 => Some(StatusCode::Forbidden),
            404 => Some(StatusCode::NotFound),
            405 => Some(StatusCode::MethodNotAllowed),
            500 => Some(StatusCode::InternalServerError),
            _ => None,
        }
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    ///
    /// # Ejemplo
    /// ```
    /// use redunix_static::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::MethodNotAllowed.reason_phrase(), "Method Not Allowed");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

impl From<StatusCode> for u16 {
    fn from(status: StatusCode) -> u16 {
        status.as_u16()
    }
}

/// Frase de razón para un código arbitrario
///
/// Los códigos fuera de la tabla se imprimen como `Unknown`.
///
/// ```
/// use redunix_static::http::status::reason_phrase_for;
/// assert_eq!(reason_phrase_for(404), "Not Found");
/// assert_eq!(reason_phrase_for(418), "Unknown");
/// ```
pub fn reason_phrase_for(code: u16) -> &'static str {
    StatusCode::from_u16(code)
        .map(|status| status.reason_phrase())
        .unwrap_or("Unknown")
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
