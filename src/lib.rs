//! # RedUnix Static
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo de archivos estáticos con un thread por
//! conexión, más un cliente de carga para ejercitarlo.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: parsing de la request line y construcción de responses
//! - `resolver`: traducción de paths a archivos dentro del document root
//! - `server`: accept loop, despacho por thread y handler de conexión
//! - `error`: taxonomía de errores y su código HTTP
//! - `config`: configuración por CLI y variables de entorno
//! - `logging`: inicialización del logger
//! - `samples`: contenido de ejemplo para el document root
//! - `client`: cliente de carga (requests individuales y concurrentes)
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use redunix_static::config::Config;
//! use redunix_static::server::Server;
//!
//! let config = Config::default();
//! let server = Server::bind(config).expect("Error al iniciar servidor");
//! server.run().expect("Error en el accept loop");
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod resolver;
pub mod samples;
pub mod server;

#[cfg(test)]
pub(crate) mod test_support;
