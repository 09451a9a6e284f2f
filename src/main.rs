//! # RedUnix Static - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor de archivos estáticos.

use log::{info, warn};
use redunix_static::config::Config;
use redunix_static::logging;
use redunix_static::samples;
use redunix_static::server::{Server, ShutdownHandle};

fn main() {
    println!("=================================");
    println!("  RedUnix Static HTTP/1.1 Server");
    println!("  Un thread por conexión");
    println!("=================================\n");

    // Crear configuración (CLI + env)
    let config = Config::new();
    if let Err(e) = config.validate() {
        eprintln!("💥 Configuración inválida: {}", e);
        std::process::exit(2);
    }

    logging::init(&config.log_level);
    config.print_summary();

    if config.create_samples {
        if let Err(e) = samples::create_sample_files(&config.document_root) {
            eprintln!("💥 No se pudo crear el contenido de ejemplo: {}", e);
            std::process::exit(1);
        }
    }

    // Crear el servidor
    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("💥 Error al iniciar: {}", e);
            std::process::exit(1);
        }
    };

    install_shutdown_signal(server.shutdown_handle());

    info!("server ready at http://{}", server.local_addr());
    info!("press Ctrl+C to stop");

    // Iniciar el servidor (esto bloqueará el thread)
    if let Err(e) = server.run() {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }
}

/// Ctrl+C / SIGTERM dejan de aceptar y esperan a los handlers en vuelo
fn install_shutdown_signal(handle: ShutdownHandle) {
    let result = ctrlc::set_handler(move || {
        info!("shutdown signal received");
        handle.shutdown();
    });

    if let Err(e) = result {
        warn!("could not install signal handler, Ctrl+C will kill the process: {}", e);
    }
}
