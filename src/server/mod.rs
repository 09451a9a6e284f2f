//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes y crea un thread por cada una
//! 3. Lee y parsea la request line
//! 4. Resuelve el archivo y envía la response HTTP

pub mod connection;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use connection::handle_connection;
pub use tcp::{Server, ShutdownHandle};
