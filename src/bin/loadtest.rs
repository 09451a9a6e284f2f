//! # Cliente de Carga - Entry Point
//! src/bin/loadtest.rs
//!
//! Pruebas individuales por path y luego una ráfaga concurrente.
//!
//! ```bash
//! ./loadtest --port 8080 --requests 20 --path / --path /api/data.json
//! ./loadtest --requests 50 --json > report.json
//! ```

use clap::Parser;
use redunix_static::client::{make_request, run_concurrent, LoadReport};
use std::error::Error;
use std::time::{Duration, Instant};

const DEFAULT_PATHS: [&str; 5] = ["/", "/about.html", "/api/data.json", "/styles.css", "/noexiste.html"];
const PREVIEW_BYTES: usize = 200;

/// Cliente de prueba para el servidor de archivos estáticos
#[derive(Debug, Parser)]
#[command(name = "loadtest")]
#[command(version)]
struct Args {
    /// Host del servidor
    #[arg(long, default_value = "localhost", env = "HTTP_HOST")]
    host: String,

    /// Puerto del servidor
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    port: u16,

    /// Número de requests concurrentes (0 = solo pruebas individuales)
    #[arg(short = 'n', long, default_value = "10")]
    requests: usize,

    /// Paths a probar (repetible)
    #[arg(long = "path")]
    paths: Vec<String>,

    /// Método para las pruebas individuales
    #[arg(short, long, default_value = "GET")]
    method: String,

    /// Timeout por request, en segundos
    #[arg(long, default_value = "10")]
    timeout: u64,

    /// Imprime solo el reporte de la ráfaga en JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    redunix_static::logging::init("warn");
    let args = Args::parse();

    let addr = format!("{}:{}", args.host, args.port);
    let timeout = Duration::from_secs(args.timeout);
    let paths: Vec<String> = if args.paths.is_empty() {
        DEFAULT_PATHS.iter().map(|p| p.to_string()).collect()
    } else {
        args.paths.clone()
    };

    if args.json {
        let report = run_concurrent(&addr, &paths, args.requests, timeout);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "=".repeat(60));
    println!("  Cliente de prueba - http://{}", addr);
    println!("{}", "=".repeat(60));

    for path in &paths {
        single_request(&addr, path, &args.method, timeout);
    }

    if args.requests > 0 {
        println!("\n{}", "=".repeat(60));
        println!("Probando {} solicitudes concurrentes", args.requests);
        println!("{}", "=".repeat(60));

        let report = run_concurrent(&addr, &paths, args.requests, timeout);
        print_report(&report);
    }

    Ok(())
}

fn single_request(addr: &str, path: &str, method: &str, timeout: Duration) {
    println!("\n--- {} {} ---", method, path);

    let start = Instant::now();
    let result = make_request(addr, path, method, timeout);
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    match result {
        Err(e) => println!("❌ Error: {}", e),
        Ok(response) => {
            println!("✅ Status: {} {}", response.status_code, response.status_text);
            println!("✅ Content-Type: {}", response.header("Content-Type").unwrap_or("N/A"));
            println!("✅ Content-Length: {}", response.header("Content-Length").unwrap_or("N/A"));
            println!("✅ Tiempo de respuesta: {:.2} ms", elapsed_ms);

            if response.is_textual() && !response.body.is_empty() {
                let end = response.body.len().min(PREVIEW_BYTES);
                let mut preview = String::from_utf8_lossy(&response.body[..end]).into_owned();
                if response.body.len() > PREVIEW_BYTES {
                    preview.push_str("...");
                }
                println!("\n{}", preview);
            }
        }
    }
}

fn print_report(report: &LoadReport) {
    for outcome in &report.outcomes {
        match (&outcome.error, outcome.status_code) {
            (Some(e), _) => println!("  [{}] ❌ {} - Error: {}", outcome.index + 1, outcome.path, e),
            (None, Some(code)) => println!(
                "  [{}] ✅ {} - Status: {} ({} bytes, {:.2} ms)",
                outcome.index + 1,
                outcome.path,
                code,
                outcome.body_length,
                outcome.latency_ms
            ),
            (None, None) => println!("  [{}] ? {}", outcome.index + 1, outcome.path),
        }
    }

    println!("\n--- Resumen ---");
    println!("Total de solicitudes: {}", report.total);
    println!("Exitosas: {}", report.successful);
    println!("Fallidas: {}", report.failed);
    println!("Tiempo total: {:.2} segundos", report.elapsed_secs);
    println!("Solicitudes por segundo: {:.2}", report.requests_per_sec);
}
