//! # Logging
//! src/logging.rs
//!
//! Inicializa `env_logger` detrás de la fachada `log`. `RUST_LOG` tiene
//! prioridad sobre el nivel de la configuración.

use env_logger::{Builder, Env};

/// Inicializa el logger global con `level` como filtro por defecto
///
/// Llamadas repetidas (por ejemplo desde tests) se ignoran.
pub fn init(level: &str) {
    let _ = Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .format_target(false)
        .try_init();
}
