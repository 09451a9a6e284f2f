//! # Módulo HTTP
//!
//! Subconjunto de HTTP/1.1 que necesita un servidor de archivos estáticos:
//!
//! - Parsing de la request line (método, target, versión)
//! - Construcción de responses con headers obligatorios
//! - Tabla cerrada de status codes
//!
//! No hay conexiones persistentes, chunked encoding ni bodies de request:
//! cada conexión lleva exactamente un request y una response.
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path?query=value HTTP/1.1\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Date: ...\r\n
//! Server: ...\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 13\r\n
//! Connection: close\r\n
//! \r\n
//! <h1>hola</h1>
//! ```

pub mod request;   // Parsing de la request line
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

pub use request::{Method, Request};
pub use response::Response;
pub use status::StatusCode;
