//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! Arma la status line, los headers obligatorios y el body en bytes listos
//! para el socket.
//!
//! ## Formato
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Date: Sun, 06 Nov 1994 08:49:37 GMT\r\n
//! Server: RedUnix-Static/0.1.0\r\n
//! Content-Type: application/json\r\n
//! Content-Length: 13\r\n
//! Connection: close\r\n
//! \r\n
//! {"ok": true}
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use redunix_static::http::Response;
//!
//! let response = Response::file("text/plain", b"hola".to_vec(), true);
//! assert_eq!(response.status(), 200);
//! assert_eq!(response.header("Content-Length"), Some("4"));
//!
//! let head = Response::file("text/plain", b"hola".to_vec(), false);
//! assert!(head.to_bytes().ends_with(b"\r\n\r\n"));
//! ```

use super::status::reason_phrase_for;
use super::StatusCode;
use std::time::SystemTime;

/// Valor del header `Server`
pub const SERVER_NAME: &str = concat!("RedUnix-Static/", env!("CARGO_PKG_VERSION"));

/// Content type de las páginas de error
pub const ERROR_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Respuesta HTTP/1.1 completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado numérico (puede estar fuera de la tabla)
    status: u16,

    /// Headers en orden de inserción (el orden se ve en el cable)
    headers: Vec<(String, String)>,

    /// Cuerpo que *se enviaría*; Content-Length siempre refleja su tamaño
    body: Vec<u8>,

    /// false para HEAD: se mandan los headers pero no el body
    include_body: bool,
}

impl Response {
    /// Crea una respuesta sin headers ni body
    ///
    /// Acepta un `StatusCode` o un `u16` arbitrario.
    pub fn new(status: impl Into<u16>) -> Self {
        Self {
            status: status.into(),
            headers: Vec::new(),
            body: Vec::new(),
            include_body: true,
        }
    }

    /// Agrega un header; si ya existe se reemplaza en su posición original
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Versión mutable de `with_header`
    pub fn add_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Establece el body y recalcula `Content-Length`
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        let length = self.body.len().to_string();
        self.add_header("Content-Length", &length);
        self
    }

    /// Marca si el body viaja o no (HEAD)
    pub fn with_include_body(mut self, include_body: bool) -> Self {
        self.include_body = include_body;
        self
    }

    /// Respuesta completa con los cinco headers obligatorios en orden fijo:
    /// Date, Server, Content-Type, Content-Length, Connection.
    pub fn build(status: impl Into<u16>, content_type: &str, body: Vec<u8>, include_body: bool) -> Self {
        Self::new(status)
            .with_header("Date", &http_date(SystemTime::now()))
            .with_header("Server", SERVER_NAME)
            .with_header("Content-Type", content_type)
            .with_body_bytes(body)
            .with_header("Connection", "close")
            .with_include_body(include_body)
    }

    /// 200 OK con el contenido de un archivo
    pub fn file(content_type: &str, body: Vec<u8>, include_body: bool) -> Self {
        Self::build(StatusCode::Ok, content_type, body, include_body)
    }

    /// Página HTML de error con código, frase y mensaje
    ///
    /// ```
    /// use redunix_static::http::{Response, StatusCode};
    ///
    /// let response = Response::error_page(StatusCode::NotFound, "Resource not found: /x", true);
    /// let body = String::from_utf8(response.body().to_vec()).unwrap();
    /// assert!(body.contains("404"));
    /// assert!(body.contains("Not Found"));
    /// ```
    pub fn error_page(status: impl Into<u16>, message: &str, include_body: bool) -> Self {
        let code = status.into();
        let body = render_error_page(code, message);
        Self::build(code, ERROR_CONTENT_TYPE, body.into_bytes(), include_body)
    }

    /// Convierte la respuesta a bytes listos para el socket
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(256 + self.body.len());

        // 1. Status line
        let status_line = format!("HTTP/1.1 {} {}\r\n", self.status, reason_phrase_for(self.status));
        result.extend_from_slice(status_line.as_bytes());

        // 2. Headers
        for (name, value) in &self.headers {
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }

        // 3. Línea vacía
        result.extend_from_slice(b"\r\n");

        // 4. Body, salvo en HEAD
        if self.include_body {
            result.extend_from_slice(&self.body);
        }

        result
    }

    /// Código de estado
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Headers en orden de inserción
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Busca un header (sin distinguir mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Body que se enviaría
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn include_body(&self) -> bool {
        self.include_body
    }
}

/// Fecha en formato HTTP (IMF-fixdate), ej: `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn http_date(time: SystemTime) -> String {
    httpdate::fmt_http_date(time)
}

fn render_error_page(code: u16, message: &str) -> String {
    let reason = reason_phrase_for(code);
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="UTF-8">
    <title>Error {code}</title>
    <style>
        body {{ font-family: Arial, sans-serif; text-align: center; padding: 50px; }}
        .error-code {{ font-size: 72px; color: #333; }}
    </style>
</head>
<body>
    <div class="error-code">{code}</div>
    <h1>{reason}</h1>
    <p class="message">{message}</p>
    <hr>
    <small>{server}</small>
</body>
</html>"#,
        code = code,
        reason = reason,
        message = escape_html(message),
        server = SERVER_NAME,
    )
}

/// El mensaje puede contener el path del cliente
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
