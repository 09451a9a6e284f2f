//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor de archivos con soporte para argumentos CLI y
//! variables de entorno. Se construye una sola vez al arrancar y después es
//! de solo lectura.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./redunix_static --port 8080 \
//!   --document-root ./www \
//!   --timeout 10 \
//!   --create-samples
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 HTTP_HOST=0.0.0.0 DOCUMENT_ROOT=/srv/www ./redunix_static
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Configuración del servidor HTTP/1.1 de archivos estáticos
#[derive(Debug, Clone, Parser)]
#[command(name = "redunix_static")]
#[command(about = "Servidor HTTP/1.1 de archivos estáticos, un thread por conexión")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "localhost", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio raíz desde el que se sirven los archivos
    #[arg(short, long = "document-root", default_value = "./www", env = "DOCUMENT_ROOT")]
    pub document_root: PathBuf,

    /// Timeout de lectura/escritura por conexión, en segundos
    #[arg(long = "timeout", default_value = "10", env = "CONNECTION_TIMEOUT")]
    pub timeout_secs: u64,

    /// Genera el contenido de ejemplo en el document root antes de arrancar
    #[arg(long = "create-samples")]
    pub create_samples: bool,

    /// Nivel de log (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use redunix_static::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "localhost:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Timeout por conexión
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }
        if self.document_root.as_os_str().is_empty() {
            return Err("Document root must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("Connection timeout must be > 0".to_string());
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(format!("Unknown log level: {}", self.log_level));
        }
        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("╔══════════════════════════════════════════════════════════════╗");
        println!("║          RedUnix Static HTTP/1.1 Server Configuration        ║");
        println!("╚══════════════════════════════════════════════════════════════╝");
        println!();
        println!("🌐 Network:");
        println!("   Address:        {}", self.address());
        println!("   Timeout:        {} s per connection", self.timeout_secs);
        println!();
        println!("📁 Content:");
        println!("   Document root:  {}", self.document_root.display());
        println!("   Create samples: {}", if self.create_samples { "yes" } else { "no" });
        println!();
        println!("🧵 Concurrency:    un thread por conexión");
        println!("📝 Log level:      {}", self.log_level);
        println!();
        println!("═══════════════════════════════════════════════════════════════");
        println!();
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            host: "localhost".to_string(),
            document_root: PathBuf::from("./www"),
            timeout_secs: 10,
            create_samples: false,
            log_level: "info".to_string(),
        }
    }
}
