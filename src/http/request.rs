//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser mínimo de la request line. Solo nos interesa la primera línea;
//! los headers se ignoran y no se lee body.
//!
//! ## Formato
//!
//! ```text
//! GET /api/data.json?x=1 HTTP/1.1\r\n
//! Host: localhost:8080\r\n
//! \r\n
//! ```
//!
//! El parser no valida el método ni la versión: la política de métodos
//! (solo GET y HEAD) se aplica en el handler de conexión.

use crate::error::ServeError;

/// Métodos HTTP que el servidor acepta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// HEAD - Como GET pero solo retorna headers
    HEAD,
}

impl Method {
    /// Convierte el token de la request line en un método soportado
    ///
    /// # Errores
    ///
    /// `ServeError::UnsupportedMethod` para cualquier otro token (405)
    pub fn from_token(token: &str) -> Result<Self, ServeError> {
        match token {
            "GET" => Ok(Method::GET),
            "HEAD" => Ok(Method::HEAD),
            other => Err(ServeError::UnsupportedMethod(other.to_string())),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
        }
    }

    /// Si la respuesta a este método lleva body
    pub fn includes_body(&self) -> bool {
        *self == Method::GET
    }
}

/// Request parseado. Inmutable una vez construido.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Token del método tal como llegó (ej: "GET", "PUT")
    method: String,

    /// Path decodificado y sin query string (ej: "/api/data.json")
    path: String,

    /// Versión HTTP tal como llegó (ej: "HTTP/1.1")
    version: String,
}

impl Request {
    /// Parsea la request line desde los bytes recibidos
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use redunix_static::http::Request;
    ///
    /// let raw = b"GET /docs/mi%20archivo.txt?v=2 HTTP/1.1\r\nHost: x\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.method(), "GET");
    /// assert_eq!(request.path(), "/docs/mi archivo.txt");
    /// assert_eq!(request.version(), "HTTP/1.1");
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ServeError> {
        let text = String::from_utf8_lossy(buffer);

        let request_line = text.split("\r\n").next().unwrap_or("");
        if request_line.trim().is_empty() {
            return Err(ServeError::MalformedRequest("empty request line".to_string()));
        }

        let parts: Vec<&str> = request_line.split_whitespace().collect();

        // Debe tener exactamente 3 partes: METHOD TARGET VERSION
        if parts.len() != 3 {
            return Err(ServeError::MalformedRequest(format!(
                "expected 3 tokens in request line, got {}",
                parts.len()
            )));
        }

        Ok(Request {
            method: parts[0].to_string(),
            path: Self::decode_target(parts[1]),
            version: parts[2].to_string(),
        })
    }

    /// Decodifica el target y se queda solo con el path
    ///
    /// Ejemplo: "/a%20b.txt?x=1#top" → "/a b.txt"
    fn decode_target(target: &str) -> String {
        let target = Self::strip_absolute_form(target);

        let decoded = urlencoding::decode_binary(target.as_bytes());
        let decoded = String::from_utf8_lossy(&decoded);

        // El query y el fragmento se descartan después de decodificar
        let end = decoded.find(&['?', '#'][..]).unwrap_or(decoded.len());
        decoded[..end].to_string()
    }

    /// "http://host:8080/a/b" → "/a/b"
    fn strip_absolute_form(target: &str) -> &str {
        let rest = match target
            .strip_prefix("http://")
            .or_else(|| target.strip_prefix("https://"))
        {
            Some(rest) => rest,
            None => return target,
        };

        match rest.find('/') {
            Some(slash) => &rest[slash..],
            None => "/",
        }
    }

    // === Métodos públicos para acceder a los campos ===

    /// Token del método tal como llegó
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Path decodificado
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }
}
